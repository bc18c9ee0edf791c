// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Structural lookups against a schema.
//!
//! This trait lets the type-name resolver query any schema source without
//! depending on [`Schema`] directly, so tests can supply small in-memory
//! schemas.

use std::collections::HashSet;

use super::ast::{Schema, SchemaPropertyData, SchemaStruct};
use crate::core::Ancestry;

/// Point lookups by structural path.
pub trait SchemaLookup {
    /// Find a struct or class definition by exact name.
    fn find_struct(&self, name: &str) -> Option<&SchemaStruct>;

    /// Look up the declared data of property `name` nested under `ancestry`.
    ///
    /// The innermost ancestor names the owning struct; its super chain is
    /// searched when the property is inherited. Returns `None` when the
    /// ancestry is empty, the owner is unknown, or no struct in the chain
    /// declares the property.
    fn property_data(&self, name: &str, ancestry: &Ancestry) -> Option<&SchemaPropertyData> {
        let owner = ancestry.parent()?;
        let mut visited = HashSet::new();
        let mut current = self.find_struct(owner.as_str());

        while let Some(def) = current {
            if !visited.insert(def.name.as_str()) {
                break;
            }
            if let Some(prop) = def.property(name) {
                return Some(&prop.data);
            }
            current = def
                .super_type
                .as_deref()
                .and_then(|super_name| self.find_struct(super_name));
        }
        None
    }

    /// Struct type of a struct-typed property.
    fn struct_type(&self, name: &str, ancestry: &Ancestry) -> Option<&str> {
        match self.property_data(name, ancestry)? {
            SchemaPropertyData::Struct { struct_type } => Some(struct_type.as_str()),
            _ => None,
        }
    }

    /// Enum name of an enum-typed property.
    fn enum_name(&self, name: &str, ancestry: &Ancestry) -> Option<&str> {
        match self.property_data(name, ancestry)? {
            SchemaPropertyData::Enum { enum_name, .. } => Some(enum_name.as_str()),
            _ => None,
        }
    }

    /// Element data of an array, set or optional property.
    fn container_inner(&self, name: &str, ancestry: &Ancestry) -> Option<&SchemaPropertyData> {
        match self.property_data(name, ancestry)? {
            SchemaPropertyData::Container { inner, .. } => Some(inner.as_ref()),
            _ => None,
        }
    }

    /// Key and value data of a map property.
    fn map_types(
        &self,
        name: &str,
        ancestry: &Ancestry,
    ) -> Option<(&SchemaPropertyData, &SchemaPropertyData)> {
        match self.property_data(name, ancestry)? {
            SchemaPropertyData::Map { key, value } => Some((key.as_ref(), value.as_ref())),
            _ => None,
        }
    }
}

impl SchemaLookup for Schema {
    fn find_struct(&self, name: &str) -> Option<&SchemaStruct> {
        self.get_struct(name)
    }
}
