// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Complete property type-name reconstruction.
//!
//! Packages at or above [`PROPERTY_TAG_COMPLETE_TYPE_NAME`] store a flattened
//! type descriptor with every property tag. Documents produced by an overlay
//! rewrite lack them, so they are rebuilt here from three sources, in order:
//! the property's own content, the schema overlay, and the legacy type tags
//! older revisions carried. Anything still unknown degrades to `Generic` or
//! `None` and is reported as a [`Placeholder`].
//!
//! [`PROPERTY_TAG_COMPLETE_TYPE_NAME`]: crate::package::PROPERTY_TAG_COMPLETE_TYPE_NAME

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, info, warn};

use crate::core::{
    ensure_name, ArrayValue, ByteValue, FName, MapEntry, NameTable, Property, PropertyTypeName,
    PropertyValue, Result, TypeNameNode,
};
use crate::package::{resolve_ancestries, AssetDocument, MAX_PROPERTY_DEPTH};
use crate::schema::{PropertyKind, Schema, SchemaLookup, SchemaPropertyData};

/// Struct type used when none can be determined.
pub const GENERIC_STRUCT: &str = "Generic";

/// Type name used when an enum or simple type cannot be determined.
pub const NONE_NAME: &str = "None";

/// Why a document was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Unversioned properties carry no tags at all
    UnversionedProperties,
    /// Revision predates complete type names
    LegacyVersion(i32),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnversionedProperties => f.write_str("document has unversioned properties"),
            SkipReason::LegacyVersion(version) => {
                write!(f, "object version {version} predates complete type names")
            }
        }
    }
}

/// A type name that fell back to a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// `Export:Owner.Property` of the property whose type name holds it
    pub location: String,
    /// The placeholder written, `Generic` or `None`
    pub substituted: String,
}

/// Outcome of [`TypeNameResolver::populate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateReport {
    /// Type names built by this call
    pub populated: usize,
    /// Type names that were already present
    pub preserved: usize,
    pub placeholders: Vec<Placeholder>,
    pub skipped: Option<SkipReason>,
}

impl PopulateReport {
    /// Whether every built type name was resolved precisely.
    pub fn is_precise(&self) -> bool {
        self.placeholders.is_empty()
    }
}

/// Fills in missing complete type names.
#[derive(Debug, Clone, Copy)]
pub struct TypeNameResolver {
    max_depth: usize,
}

impl Default for TypeNameResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeNameResolver {
    pub fn new() -> Self {
        Self {
            max_depth: MAX_PROPERTY_DEPTH,
        }
    }

    /// Set the nesting limit for property trees.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Populate every missing type name in `document`.
    ///
    /// Does nothing when the revision does not store complete type names.
    /// Existing type names are kept as they are; their children are still
    /// visited. Fails only when ancestries cannot be resolved.
    pub fn populate(&self, document: &mut AssetDocument) -> Result<PopulateReport> {
        if let Some(reason) = skip_reason(document) {
            warn!(
                context = "populate_type_names",
                reason = %reason,
                "Skipping type name population"
            );
            return Ok(PopulateReport {
                skipped: Some(reason),
                ..PopulateReport::default()
            });
        }

        resolve_ancestries(document, self.max_depth)?;

        let schema = document.schema().cloned();
        let mut builder = NodeBuilder {
            names: &mut document.names,
            schema: schema.as_deref(),
            overrides: &document.array_struct_type_override,
            location: String::new(),
            placeholders: Vec::new(),
        };
        let mut report = PopulateReport::default();

        for export in &mut document.exports {
            let Some(properties) = export.properties.as_mut() else {
                continue;
            };
            for property in properties.iter_mut() {
                builder.visit(export.object_name.as_str(), property, &mut report);
            }
        }
        report.placeholders = builder.placeholders;

        info!(
            context = "populate_type_names",
            populated = report.populated,
            preserved = report.preserved,
            placeholders = report.placeholders.len(),
            "Populated property type names"
        );
        Ok(report)
    }
}

fn skip_reason(document: &AssetDocument) -> Option<SkipReason> {
    if document.requires_complete_type_names() {
        None
    } else if document.has_unversioned_properties {
        Some(SkipReason::UnversionedProperties)
    } else {
        Some(SkipReason::LegacyVersion(document.object_version_ue5))
    }
}

struct NodeBuilder<'a> {
    names: &'a mut NameTable,
    schema: Option<&'a Schema>,
    overrides: &'a HashMap<String, String>,
    /// Location of the property currently being named
    location: String,
    placeholders: Vec<Placeholder>,
}

impl<'a> NodeBuilder<'a> {
    fn visit(&mut self, export: &str, property: &mut Property, report: &mut PopulateReport) {
        if property.type_name.is_some() {
            report.preserved += 1;
        } else {
            self.location = if property.ancestry.is_empty() {
                format!("{export}:{}", property.name)
            } else {
                format!("{export}:{}.{}", property.ancestry, property.name)
            };
            let nodes = self.build(property);
            property.type_name = Some(PropertyTypeName::new(nodes));
            report.populated += 1;
        }

        for child in property.children_mut() {
            self.visit(export, child, report);
        }
    }

    fn build(&mut self, property: &Property) -> Vec<TypeNameNode> {
        match &property.value {
            PropertyValue::Set { elements, .. } => self.array_nodes("SetProperty", property, elements),
            PropertyValue::Array(array) => self.array_nodes("ArrayProperty", property, array),
            PropertyValue::Map {
                key_type,
                value_type,
                entries,
                ..
            } => self.map_nodes(property, key_type.as_ref(), value_type.as_ref(), entries),
            PropertyValue::Struct {
                struct_type, raw, ..
            } => {
                let root = if *raw { "RawStructProperty" } else { "StructProperty" };
                self.struct_nodes(property, root, struct_type.as_ref())
            }
            PropertyValue::Enum { enum_type, .. } => {
                self.enum_nodes(property, "EnumProperty", enum_type.as_ref())
            }
            PropertyValue::Byte {
                value: ByteValue::Numeric(_),
                ..
            } => vec![self.node("ByteProperty", 1), self.node(NONE_NAME, 0)],
            PropertyValue::Byte {
                enum_type,
                value: ByteValue::Enum(_),
            } => self.enum_nodes(property, "ByteProperty", enum_type.as_ref()),
            PropertyValue::Simple { property_type, .. } => {
                vec![self.node(property_type.as_deref().unwrap_or(NONE_NAME), 0)]
            }
        }
    }

    fn array_nodes(&mut self, root: &str, property: &Property, array: &ArrayValue) -> Vec<TypeNameNode> {
        let mut nodes = vec![self.node(root, 1)];
        let schema = self.schema;

        if let Some(first) = array.elements.first() {
            nodes.extend(self.build(first));
        } else if let Some(inner) =
            schema.and_then(|s| s.container_inner(property.name.as_str(), &property.ancestry))
        {
            nodes.extend(self.schema_nodes(inner));
        } else {
            match &array.element_type {
                None => nodes.extend(self.struct_nodes(property, "StructProperty", None)),
                Some(tag) if *tag == "StructProperty" => {
                    let hint = self
                        .overrides
                        .get(property.name.as_str())
                        .map(|s| FName::dummy(s.as_str()))
                        .or_else(|| array.dummy_struct_type.clone());
                    nodes.extend(self.struct_nodes(property, "StructProperty", hint.as_ref()));
                }
                Some(tag) => nodes.push(self.tag_node(tag)),
            }
        }
        nodes
    }

    fn map_nodes(
        &mut self,
        property: &Property,
        key_type: Option<&FName>,
        value_type: Option<&FName>,
        entries: &[MapEntry],
    ) -> Vec<TypeNameNode> {
        let mut nodes = vec![self.node("MapProperty", 2)];
        let schema = self.schema;

        if let Some(first) = entries.first() {
            nodes.extend(self.build(&first.key));
            nodes.extend(self.build(&first.value));
        } else if let Some((key, value)) =
            schema.and_then(|s| s.map_types(property.name.as_str(), &property.ancestry))
        {
            nodes.extend(self.schema_nodes(key));
            nodes.extend(self.schema_nodes(value));
        } else if let (Some(key), Some(value)) = (key_type, value_type) {
            nodes.push(self.tag_node(key));
            nodes.push(self.tag_node(value));
        } else {
            for _ in 0..2 {
                nodes.extend(self.struct_nodes(property, "StructProperty", None));
            }
        }
        nodes
    }

    fn struct_nodes(&mut self, property: &Property, root: &str, struct_type: Option<&FName>) -> Vec<TypeNameNode> {
        let schema = self.schema;
        // `Generic` is itself the placeholder, never a resolved type.
        let candidate = match struct_type {
            Some(name) if *name != GENERIC_STRUCT => Some(name.clone()),
            _ => schema
                .and_then(|s| s.struct_type(property.name.as_str(), &property.ancestry))
                .filter(|name| *name != GENERIC_STRUCT)
                .map(FName::dummy),
        };
        let name = self.ensure(candidate.as_ref(), GENERIC_STRUCT);
        vec![self.node(root, 1), TypeNameNode::new(name, 0)]
    }

    fn enum_nodes(&mut self, property: &Property, root: &str, enum_type: Option<&FName>) -> Vec<TypeNameNode> {
        let schema = self.schema;
        let candidate = enum_type.filter(|name| !name.is_empty()).cloned().or_else(|| {
            schema
                .and_then(|s| s.enum_name(property.name.as_str(), &property.ancestry))
                .map(FName::dummy)
        });
        let name = self.ensure(candidate.as_ref(), NONE_NAME);
        vec![self.node(root, 1), TypeNameNode::new(name, 0)]
    }

    fn schema_nodes(&mut self, data: &SchemaPropertyData) -> Vec<TypeNameNode> {
        match data {
            SchemaPropertyData::Map { key, value } => {
                let mut nodes = vec![self.node("MapProperty", 2)];
                nodes.extend(self.schema_nodes(key));
                nodes.extend(self.schema_nodes(value));
                nodes
            }
            SchemaPropertyData::Container { kind, inner } => {
                let mut nodes = vec![self.node(kind.as_str(), 1)];
                nodes.extend(self.schema_nodes(inner));
                nodes
            }
            SchemaPropertyData::Struct { struct_type } => {
                let struct_type = non_empty(struct_type, GENERIC_STRUCT);
                if struct_type == GENERIC_STRUCT {
                    self.record_placeholder(GENERIC_STRUCT);
                }
                vec![self.node("StructProperty", 1), self.node(struct_type, 0)]
            }
            SchemaPropertyData::Enum { enum_name, .. } => {
                if enum_name.is_empty() {
                    self.record_placeholder(NONE_NAME);
                }
                vec![
                    self.node("EnumProperty", 1),
                    self.node(non_empty(enum_name, NONE_NAME), 0),
                ]
            }
            SchemaPropertyData::Simple(PropertyKind::Byte) => {
                vec![self.node("ByteProperty", 1), self.node(NONE_NAME, 0)]
            }
            SchemaPropertyData::Simple(kind) => vec![self.node(kind.as_str(), 0)],
        }
    }

    /// A leaf node for a legacy type tag.
    fn tag_node(&mut self, tag: &FName) -> TypeNameNode {
        TypeNameNode::new(self.ensure(Some(tag), NONE_NAME), 0)
    }

    fn node(&mut self, name: &str, inner_count: u32) -> TypeNameNode {
        TypeNameNode::new(self.names.intern(non_empty(name, NONE_NAME)), inner_count)
    }

    fn ensure(&mut self, candidate: Option<&FName>, fallback: &str) -> FName {
        let (name, used_fallback) = ensure_name(self.names, candidate, fallback);
        if used_fallback {
            self.record_placeholder(fallback);
        }
        name
    }

    fn record_placeholder(&mut self, substituted: &str) {
        debug!(
            context = "populate_type_names",
            location = %self.location,
            placeholder = substituted,
            "Type name fell back to placeholder"
        );
        self.placeholders.push(Placeholder {
            location: self.location.clone(),
            substituted: substituted.to_string(),
        });
    }
}

fn non_empty<'s>(value: &'s str, fallback: &'s str) -> &'s str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}
