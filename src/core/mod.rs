// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout assetport.
//!
//! This module provides the foundational types for the library:
//! - [`PortError`] - Error taxonomy shared by every stage
//! - [`ByteAsset`] - One immutable half of a package
//! - [`NameTable`] / [`FName`] - Package name tables with explicit growth
//! - [`Property`] - The closed property tree produced by a format engine
//! - [`Registry`] - Thread-safe name-keyed cache

pub mod asset;
pub mod error;
pub mod name;
pub mod property;
pub mod registry;

pub use asset::ByteAsset;
pub use error::{PortError, Result};
pub use name::{ensure_name, FName, NameOrigin, NameTable, TableId};
pub use property::{
    Ancestry, ArrayValue, ByteValue, MapEntry, Property, PropertyTypeName, PropertyValue,
    SimpleValue, TypeNameNode,
};
pub use registry::Registry;
