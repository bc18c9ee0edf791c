// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Usmap type schemas.
//!
//! This module provides:
//! - [`reader`] - parsing of binary usmap files (plain or Zstandard bodies)
//! - [`lookup`] - point lookups by property name and ancestry
//! - [`SchemaRegistry`] - process-wide cache of parsed schemas

pub mod ast;
pub mod lookup;
pub mod reader;

use std::path::Path;
use std::sync::Arc;

pub use ast::{
    CompressionMethod, PackageVersioning, PropertyKind, Schema, SchemaEnum, SchemaProperty,
    SchemaPropertyData, SchemaStruct, UsmapVersion,
};
pub use lookup::SchemaLookup;
pub use reader::{read_schema, read_schema_file};

use crate::core::{Registry, Result};

/// Shared cache of parsed schemas, keyed by path.
///
/// Schemas are read-only once loaded, so every caller receives the same
/// `Arc<Schema>`.
#[derive(Default)]
pub struct SchemaRegistry {
    schemas: Registry<Arc<Schema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the schema at `path`, or return the cached copy.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Arc<Schema>> {
        let path = path.as_ref();
        let key = path.display().to_string();
        self.schemas
            .get_or_try_insert_with(&key, || read_schema_file(path).map(Arc::new))
    }

    /// Register an already parsed schema under `key`.
    pub fn insert(&self, key: impl Into<String>, schema: Schema) -> Result<Arc<Schema>> {
        let schema = Arc::new(schema);
        self.schemas.register(key, Arc::clone(&schema))?;
        Ok(schema)
    }

    pub fn get(&self, key: &str) -> Result<Option<Arc<Schema>>> {
        self.schemas.get(key)
    }

    pub fn len(&self) -> Result<usize> {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.schemas.is_empty()
    }
}
