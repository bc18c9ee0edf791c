// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The property tree of an export.
//!
//! A format engine hands every normal export over as a list of [`Property`]
//! nodes. The variant set is closed: simple values, structs, arrays, sets,
//! maps, enums and bytes. Each node may carry a [`PropertyTypeName`], the
//! flattened type descriptor newer package revisions store next to every
//! property tag.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::name::FName;

/// One node of a flattened type descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeNameNode {
    /// Type or struct/enum name
    pub name: FName,
    /// Number of subtrees directly following this node
    pub inner_count: u32,
}

impl TypeNameNode {
    pub fn new(name: FName, inner_count: u32) -> Self {
        Self { name, inner_count }
    }
}

/// A complete property type name, stored as a pre-order list of nodes.
///
/// `TArray<EMyEnum>` is stored as
/// `ArrayProperty(1) -> EnumProperty(1) -> EMyEnum(0)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyTypeName {
    nodes: Vec<TypeNameNode>,
}

impl PropertyTypeName {
    pub fn new(nodes: Vec<TypeNameNode>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[TypeNameNode] {
        &self.nodes
    }

    /// The outermost type name, e.g. `MapProperty`.
    pub fn root(&self) -> Option<&FName> {
        self.nodes.first().map(|n| &n.name)
    }

    /// Whether the inner counts describe exactly one complete tree.
    pub fn is_well_formed(&self) -> bool {
        fn subtree_end(nodes: &[TypeNameNode], at: usize) -> Option<usize> {
            let node = nodes.get(at)?;
            let mut next = at + 1;
            for _ in 0..node.inner_count {
                next = subtree_end(nodes, next)?;
            }
            Some(next)
        }
        !self.nodes.is_empty() && subtree_end(&self.nodes, 0) == Some(self.nodes.len())
    }

    pub(crate) fn for_each_name_mut(&mut self, f: &mut dyn FnMut(&mut FName)) {
        for node in &mut self.nodes {
            f(&mut node.name);
        }
    }
}

impl fmt::Display for PropertyTypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{}({})", node.name, node.inner_count)?;
        }
        Ok(())
    }
}

/// Chain of enclosing class and struct names, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ancestry {
    chain: Vec<FName>,
}

impl Ancestry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chain(chain: Vec<FName>) -> Self {
        Self { chain }
    }

    /// Ancestry of a child nested one level below `parent`.
    pub fn with_parent(&self, parent: FName) -> Self {
        let mut chain = self.chain.clone();
        chain.push(parent);
        Self { chain }
    }

    /// The innermost enclosing name.
    pub fn parent(&self) -> Option<&FName> {
        self.chain.last()
    }

    pub fn chain(&self) -> &[FName] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl fmt::Display for Ancestry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.chain.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{name}")?;
        }
        Ok(())
    }
}

/// Payload of a simple property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimpleValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f32),
    Double(f64),
    Name(FName),
    Str(Option<String>),
    /// Package index of a referenced object
    Object(i32),
    /// Bytes the engine did not decode further
    Raw(Vec<u8>),
}

/// Payload of a byte property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteValue {
    /// A plain number
    Numeric(u8),
    /// An enumerator name
    Enum(FName),
}

/// Elements of an array or set, with the legacy tags older revisions carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    /// Legacy element type tag, e.g. `StructProperty`
    #[serde(default)]
    pub element_type: Option<FName>,
    /// Struct type hint the engine recorded for struct elements
    #[serde(default)]
    pub dummy_struct_type: Option<FName>,
    #[serde(default)]
    pub elements: Vec<Property>,
}

/// One map entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: Property,
    pub value: Property,
}

/// The closed set of property shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Simple {
        /// Declared property type, e.g. `IntProperty`
        #[serde(default)]
        property_type: Option<String>,
        value: SimpleValue,
    },
    Struct {
        #[serde(default)]
        struct_type: Option<FName>,
        /// Opaque struct the engine kept as raw bytes
        #[serde(default)]
        raw: bool,
        #[serde(default)]
        fields: Vec<Property>,
    },
    Array(ArrayValue),
    Set {
        elements: ArrayValue,
        #[serde(default)]
        removed: Vec<Property>,
    },
    Map {
        #[serde(default)]
        key_type: Option<FName>,
        #[serde(default)]
        value_type: Option<FName>,
        #[serde(default)]
        entries: Vec<MapEntry>,
        #[serde(default)]
        keys_to_remove: Vec<Property>,
    },
    Enum {
        #[serde(default)]
        enum_type: Option<FName>,
        #[serde(default)]
        inner_type: Option<FName>,
        #[serde(default)]
        value: Option<FName>,
    },
    Byte {
        #[serde(default)]
        enum_type: Option<FName>,
        value: ByteValue,
    },
}

/// A named property and its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: FName,
    /// Computed by ancestry resolution; never serialized
    #[serde(skip)]
    pub ancestry: Ancestry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<PropertyTypeName>,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(name: FName, value: PropertyValue) -> Self {
        Self {
            name,
            ancestry: Ancestry::new(),
            type_name: None,
            value,
        }
    }

    /// A `NameProperty`.
    pub fn name_value(name: FName, value: FName) -> Self {
        Self::new(
            name,
            PropertyValue::Simple {
                property_type: Some("NameProperty".to_string()),
                value: SimpleValue::Name(value),
            },
        )
    }

    /// A non-raw struct with the given fields.
    pub fn structure(name: FName, struct_type: FName, fields: Vec<Property>) -> Self {
        Self::new(
            name,
            PropertyValue::Struct {
                struct_type: Some(struct_type),
                raw: false,
                fields,
            },
        )
    }

    /// Engine-level kind name of this node.
    pub fn kind_name(&self) -> &str {
        match &self.value {
            PropertyValue::Simple { property_type, .. } => {
                property_type.as_deref().unwrap_or("None")
            }
            PropertyValue::Struct { raw: true, .. } => "RawStructProperty",
            PropertyValue::Struct { .. } => "StructProperty",
            PropertyValue::Array(_) => "ArrayProperty",
            PropertyValue::Set { .. } => "SetProperty",
            PropertyValue::Map { .. } => "MapProperty",
            PropertyValue::Enum { .. } => "EnumProperty",
            PropertyValue::Byte { .. } => "ByteProperty",
        }
    }

    /// Direct children in visiting order.
    ///
    /// Sets yield removed elements before kept ones; maps yield removed keys
    /// before each key/value pair.
    pub fn children_mut(&mut self) -> Vec<&mut Property> {
        match &mut self.value {
            PropertyValue::Struct { fields, .. } => fields.iter_mut().collect(),
            PropertyValue::Array(array) => array.elements.iter_mut().collect(),
            PropertyValue::Set { elements, removed } => removed
                .iter_mut()
                .chain(elements.elements.iter_mut())
                .collect(),
            PropertyValue::Map {
                entries,
                keys_to_remove,
                ..
            } => {
                let mut children: Vec<&mut Property> = keys_to_remove.iter_mut().collect();
                for entry in entries.iter_mut() {
                    children.push(&mut entry.key);
                    children.push(&mut entry.value);
                }
                children
            }
            PropertyValue::Simple { .. } | PropertyValue::Enum { .. } | PropertyValue::Byte { .. } => {
                Vec::new()
            }
        }
    }

    /// Find a direct struct field by name.
    pub fn field(&self, name: &str) -> Option<&Property> {
        match &self.value {
            PropertyValue::Struct { fields, .. } => fields.iter().find(|p| p.name == name),
            _ => None,
        }
    }

    /// Visit every name reference in this subtree.
    pub(crate) fn for_each_name_mut(&mut self, f: &mut dyn FnMut(&mut FName)) {
        f(&mut self.name);
        if let Some(type_name) = &mut self.type_name {
            type_name.for_each_name_mut(f);
        }
        match &mut self.value {
            PropertyValue::Simple { value, .. } => {
                if let SimpleValue::Name(name) = value {
                    f(name);
                }
            }
            PropertyValue::Struct { struct_type, .. } => {
                if let Some(name) = struct_type {
                    f(name);
                }
            }
            PropertyValue::Array(array) | PropertyValue::Set { elements: array, .. } => {
                for name in [&mut array.element_type, &mut array.dummy_struct_type]
                    .into_iter()
                    .flatten()
                {
                    f(name);
                }
            }
            PropertyValue::Map {
                key_type,
                value_type,
                ..
            } => {
                for name in [key_type, value_type].into_iter().flatten() {
                    f(name);
                }
            }
            PropertyValue::Enum {
                enum_type,
                inner_type,
                value,
            } => {
                for name in [enum_type, inner_type, value].into_iter().flatten() {
                    f(name);
                }
            }
            PropertyValue::Byte { enum_type, value } => {
                if let Some(name) = enum_type {
                    f(name);
                }
                if let ByteValue::Enum(name) = value {
                    f(name);
                }
            }
        }
        for child in self.children_mut() {
            child.for_each_name_mut(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, inner: u32) -> TypeNameNode {
        TypeNameNode::new(FName::detached(name), inner)
    }

    #[test]
    fn test_type_name_display() {
        let type_name = PropertyTypeName::new(vec![
            node("ArrayProperty", 1),
            node("EnumProperty", 1),
            node("EMyEnum", 0),
        ]);
        assert_eq!(
            type_name.to_string(),
            "ArrayProperty(1) -> EnumProperty(1) -> EMyEnum(0)"
        );
        assert_eq!(type_name.root().map(|n| n.as_str()), Some("ArrayProperty"));
    }

    #[test]
    fn test_type_name_well_formed() {
        let map = PropertyTypeName::new(vec![
            node("MapProperty", 2),
            node("NameProperty", 0),
            node("StructProperty", 1),
            node("Vector", 0),
        ]);
        assert!(map.is_well_formed());

        let truncated = PropertyTypeName::new(vec![node("MapProperty", 2), node("IntProperty", 0)]);
        assert!(!truncated.is_well_formed());

        let trailing = PropertyTypeName::new(vec![node("IntProperty", 0), node("None", 0)]);
        assert!(!trailing.is_well_formed());

        assert!(!PropertyTypeName::new(Vec::new()).is_well_formed());
    }

    #[test]
    fn test_ancestry_parent() {
        let ancestry = Ancestry::new()
            .with_parent(FName::detached("BodySetup"))
            .with_parent(FName::detached("BodyInstance"));
        assert_eq!(ancestry.parent().map(|n| n.as_str()), Some("BodyInstance"));
        assert_eq!(ancestry.len(), 2);
        assert_eq!(ancestry.to_string(), "BodySetup.BodyInstance");
    }

    #[test]
    fn test_kind_name() {
        let raw = Property::new(
            FName::detached("Blob"),
            PropertyValue::Struct {
                struct_type: None,
                raw: true,
                fields: Vec::new(),
            },
        );
        assert_eq!(raw.kind_name(), "RawStructProperty");

        let name = Property::name_value(FName::detached("Channel"), FName::detached("Attack"));
        assert_eq!(name.kind_name(), "NameProperty");
    }

    #[test]
    fn test_children_order_for_map() {
        let key = |s: &str| Property::name_value(FName::detached("Key"), FName::detached(s));
        let mut map = Property::new(
            FName::detached("Lookup"),
            PropertyValue::Map {
                key_type: None,
                value_type: None,
                entries: vec![MapEntry {
                    key: key("a"),
                    value: key("b"),
                }],
                keys_to_remove: vec![key("gone")],
            },
        );
        let order: Vec<String> = map
            .children_mut()
            .into_iter()
            .map(|p| match &p.value {
                PropertyValue::Simple {
                    value: SimpleValue::Name(n),
                    ..
                } => n.to_string(),
                _ => String::new(),
            })
            .collect();
        assert_eq!(order, vec!["gone", "a", "b"]);
    }

    #[test]
    fn test_property_json_shape() {
        let prop = Property::structure(
            FName::detached("DefaultInstance"),
            FName::detached("BodyInstance"),
            vec![Property::new(
                FName::detached("bSimulate"),
                PropertyValue::Simple {
                    property_type: Some("BoolProperty".to_string()),
                    value: SimpleValue::Bool(true),
                },
            )],
        );
        let json = serde_json::to_value(&prop).unwrap();
        assert_eq!(json["value"]["type"], "struct");
        assert_eq!(json["value"]["struct_type"], "BodyInstance");
        assert_eq!(json["value"]["fields"][0]["value"]["value"]["bool"], true);
        assert!(json.get("type_name").is_none());

        let back: Property = serde_json::from_value(json).unwrap();
        assert_eq!(back, prop);
    }
}
