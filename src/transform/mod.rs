// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Package conversion stages.
//!
//! Each stage is usable on its own:
//! - [`padding`] - byte-level section padding driven by a [`PackageLayout`]
//! - [`overlay`] - schema overlay swap and collision field substitution
//! - [`type_names`] - complete property type-name reconstruction
//!
//! [`AssetConverter`](crate::rewriter::AssetConverter) chains them.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use assetport::transform::TypeNameResolver;
//! use assetport::AssetDocument;
//!
//! let mut document = AssetDocument::from_json(&std::fs::read("SM_Rock.json")?)?;
//! let report = TypeNameResolver::new().populate(&mut document)?;
//! println!("{} type names built", report.populated);
//! # Ok(())
//! # }
//! ```
//!
//! [`PackageLayout`]: crate::package::PackageLayout

pub mod overlay;
pub mod padding;
pub mod type_names;

pub use overlay::{
    collision_responses, CollisionResponse, OverlayOutput, OverlayReport, OverlayRewriter,
    BODY_SETUP_EXPORT, COLLISION_RESPONSES, DEFAULT_INSTANCE,
};
pub use padding::{HeaderEdit, MeshPadder, PadOptions, PaddedPackage, PaddingPlan, SECTION_PADDING};
pub use type_names::{Placeholder, PopulateReport, SkipReason, TypeNameResolver};
