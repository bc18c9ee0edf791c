// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Ancestry resolution.
//!
//! Schema lookups are keyed by the struct that declares a property, so every
//! property first needs the chain of classes and structs enclosing it:
//! - top-level properties of an export: `[class]`
//! - fields of a struct: parent chain plus the struct type
//! - elements of arrays, sets and maps: parent chain plus the container name

use tracing::debug;

use super::document::AssetDocument;
use crate::core::{Ancestry, FName, PortError, Property, PropertyValue, Result};

/// Default nesting limit for property trees.
pub const MAX_PROPERTY_DEPTH: usize = 128;

/// Struct type used in ancestry chains when a struct records none.
const UNTYPED_STRUCT: &str = "Generic";

/// Compute and store the ancestry of every property in the document.
///
/// Returns the number of properties visited. Fails if an export carries
/// properties but no class name, or nesting exceeds `max_depth`.
pub fn resolve_ancestries(document: &mut AssetDocument, max_depth: usize) -> Result<usize> {
    let mut visited = 0;
    for (index, export) in document.exports.iter_mut().enumerate() {
        let Some(properties) = export.properties.as_mut() else {
            continue;
        };
        let class_name = export.class_name.clone().ok_or_else(|| {
            PortError::ancestry(format!(
                "export {index} ('{}') has properties but no class name",
                export.object_name
            ))
        })?;

        let root = Ancestry::new().with_parent(class_name);
        for property in properties.iter_mut() {
            visited += assign(property, &root, 0, max_depth)?;
        }
    }

    debug!(
        context = "resolve_ancestries",
        properties = visited,
        "Resolved property ancestries"
    );
    Ok(visited)
}

fn assign(property: &mut Property, ancestry: &Ancestry, depth: usize, max_depth: usize) -> Result<usize> {
    if depth >= max_depth {
        return Err(PortError::ancestry(format!(
            "property '{}' under '{}' is nested deeper than {max_depth} levels",
            property.name, ancestry
        )));
    }
    property.ancestry = ancestry.clone();

    let child_ancestry = match &property.value {
        PropertyValue::Struct { struct_type, .. } => {
            let parent = struct_type
                .clone()
                .unwrap_or_else(|| FName::dummy(UNTYPED_STRUCT));
            ancestry.with_parent(parent)
        }
        PropertyValue::Array(_) | PropertyValue::Set { .. } | PropertyValue::Map { .. } => {
            ancestry.with_parent(property.name.clone())
        }
        PropertyValue::Simple { .. } | PropertyValue::Enum { .. } | PropertyValue::Byte { .. } => {
            return Ok(1);
        }
    };

    let mut visited = 1;
    for child in property.children_mut() {
        visited += assign(child, &child_ancestry, depth + 1, max_depth)?;
    }
    Ok(visited)
}
