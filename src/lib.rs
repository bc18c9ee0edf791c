// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Assetport
//!
//! Retargets cooked static-mesh packages between two incompatible schema
//! versions of the same engine.
//!
//! A package is a pair of byte blobs: the header (`.uasset`) and the export
//! payload (`.uexp`). Converting one takes three stages:
//! - **Padding** in [`transform::padding`]: insert a fixed pattern before every
//!   static mesh section and keep the export table consistent
//! - **Overlay rewriting** in [`transform::overlay`]: swap the schema overlay and
//!   substitute the legacy collision field
//! - **Type names** in [`transform::type_names`]: rebuild the complete property
//!   type names newer package revisions require
//!
//! ## Architecture
//!
//! - `core/` - Errors, byte assets, name tables and the property tree
//! - `schema/` - Usmap schema files and structural lookups
//! - `package/` - Export layouts, documents, ancestry and the [`FormatEngine`] seam
//! - `transform/` - The three stages above
//! - `rewriter/` - [`AssetConverter`], which chains the stages through an engine
//!
//! Parsing and writing the container itself is delegated to a [`FormatEngine`]
//! implementation supplied by the caller.
//!
//! ## Example: Padding a package
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use assetport::package::PackageLayout;
//! use assetport::transform::MeshPadder;
//! use assetport::ByteAsset;
//!
//! let header = ByteAsset::read("SM_Rock.uasset")?;
//! let payload = ByteAsset::read("SM_Rock.uexp")?;
//! let layout = PackageLayout::from_json(&std::fs::read("SM_Rock.layout.json")?)?;
//!
//! let padded = MeshPadder::new().pad(&header, &payload, &layout)?;
//! padded.header.write("SM_Rock.uasset")?;
//! padded.payload.write("SM_Rock.uexp")?;
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

pub use core::{ByteAsset, FName, NameTable, PortError, Property, PropertyTypeName, Result};

// Schema files and lookups
pub mod schema;

pub use schema::{Schema, SchemaLookup, SchemaRegistry};

// Package layout, documents and the engine seam
pub mod package;

pub use package::{AssetDocument, FormatEngine, PackageLayout};

// Conversion stages
pub mod transform;

pub use transform::{MeshPadder, OverlayRewriter, TypeNameResolver};

// Stage orchestration
pub mod rewriter;

pub use rewriter::{AssetConverter, ConvertOptions, ConvertOutput, ConvertStats};
