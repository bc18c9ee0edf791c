// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Parsed package documents.
//!
//! An [`AssetDocument`] is the engine's navigable view of a package: exports
//! with their property trees, the name table, and the schema overlay that
//! governs how unversioned data is read.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{FName, NameTable, Property, Result};
use crate::schema::Schema;

/// First UE5 object version whose property tags carry complete type names.
pub const PROPERTY_TAG_COMPLETE_TYPE_NAME: i32 = 1012;

/// One export of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExport {
    pub object_name: FName,
    pub class_name: Option<FName>,
    /// Tagged properties; `None` for exports the engine keeps opaque
    pub properties: Option<Vec<Property>>,
    /// Engine fields this crate does not interpret
    pub extra: Map<String, Value>,
}

impl ObjectExport {
    pub fn new(object_name: FName, class_name: Option<FName>, properties: Option<Vec<Property>>) -> Self {
        Self {
            object_name,
            class_name,
            properties,
            extra: Map::new(),
        }
    }

    /// First top-level property with the given name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.as_ref()?.iter().find(|p| p.name == name)
    }

    pub fn property_mut(&mut self, name: &str) -> Option<&mut Property> {
        self.properties.as_mut()?.iter_mut().find(|p| p.name == name)
    }
}

/// A parsed package.
#[derive(Debug, Clone)]
pub struct AssetDocument {
    pub names: NameTable,
    pub exports: Vec<ObjectExport>,
    pub has_unversioned_properties: bool,
    pub object_version_ue5: i32,
    /// Struct type to assume for struct arrays the engine could not type,
    /// keyed by property name
    pub array_struct_type_override: HashMap<String, String>,
    schema: Option<Arc<Schema>>,
    extra: Map<String, Value>,
}

impl AssetDocument {
    pub fn new(names: NameTable) -> Self {
        Self {
            names,
            exports: Vec::new(),
            has_unversioned_properties: false,
            object_version_ue5: 0,
            array_struct_type_override: HashMap::new(),
            schema: None,
            extra: Map::new(),
        }
    }

    /// The schema overlay currently governing the document.
    pub fn schema(&self) -> Option<&Arc<Schema>> {
        self.schema.as_ref()
    }

    /// Swap the schema overlay, returning the previous one.
    pub fn set_schema(&mut self, schema: Arc<Schema>) -> Option<Arc<Schema>> {
        self.schema.replace(schema)
    }

    /// Whether this revision stores a complete type name with every tag.
    pub fn requires_complete_type_names(&self) -> bool {
        !self.has_unversioned_properties
            && self.object_version_ue5 >= PROPERTY_TAG_COMPLETE_TYPE_NAME
    }

    /// First export with the given object name.
    pub fn find_export(&self, object_name: &str) -> Option<(usize, &ObjectExport)> {
        self.exports
            .iter()
            .enumerate()
            .find(|(_, e)| e.object_name == object_name)
    }

    pub fn find_export_mut(&mut self, object_name: &str) -> Option<&mut ObjectExport> {
        self.exports.iter_mut().find(|e| e.object_name == object_name)
    }

    /// Parse a JSON document. Every name it mentions is bound to the
    /// document's name table.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let wire: DocumentWire = serde_json::from_slice(bytes)?;
        let mut names = NameTable::from_names(wire.names);

        let mut exports = Vec::with_capacity(wire.exports.len());
        for export in wire.exports {
            let object_name = names.intern(&export.object_name);
            let class_name = export.class_name.as_deref().map(|c| names.intern(c));
            let properties = export.properties.map(|mut props| {
                for prop in &mut props {
                    prop.for_each_name_mut(&mut |name: &mut FName| {
                        *name = names.intern(name.as_str())
                    });
                }
                props
            });
            exports.push(ObjectExport {
                object_name,
                class_name,
                properties,
                extra: export.extra,
            });
        }

        Ok(Self {
            names,
            exports,
            has_unversioned_properties: wire.has_unversioned_properties,
            object_version_ue5: wire.object_version_ue5,
            array_struct_type_override: wire.array_struct_type_override,
            schema: None,
            extra: wire.extra,
        })
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let wire = DocumentWire {
            names: self.names.names().to_vec(),
            exports: self
                .exports
                .iter()
                .map(|e| ExportWire {
                    object_name: e.object_name.to_string(),
                    class_name: e.class_name.as_ref().map(|c| c.to_string()),
                    properties: e.properties.clone(),
                    extra: e.extra.clone(),
                })
                .collect(),
            has_unversioned_properties: self.has_unversioned_properties,
            object_version_ue5: self.object_version_ue5,
            array_struct_type_override: self.array_struct_type_override.clone(),
            extra: self.extra.clone(),
        };
        Ok(serde_json::to_vec_pretty(&wire)?)
    }
}

#[derive(Serialize, Deserialize)]
struct DocumentWire {
    #[serde(default)]
    names: Vec<String>,
    #[serde(default)]
    exports: Vec<ExportWire>,
    #[serde(default)]
    has_unversioned_properties: bool,
    #[serde(default)]
    object_version_ue5: i32,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    array_struct_type_override: HashMap<String, String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct ExportWire {
    object_name: String,
    #[serde(default)]
    class_name: Option<String>,
    #[serde(default)]
    properties: Option<Vec<Property>>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}
