// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! AST types for parsed usmap schemas.

use std::collections::HashMap;

/// Usmap file format revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UsmapVersion {
    /// Initial format
    Initial = 0,
    /// Adds the optional package versioning block
    PackageVersioning = 1,
    /// Name lengths widen from u8 to u16
    LongFName = 2,
    /// Enum entry counts widen from u8 to u16
    LargeEnums = 3,
    /// Enum entries carry explicit i64 values
    ExplicitEnumValues = 4,
}

impl UsmapVersion {
    /// Newest revision this crate reads.
    pub const LATEST: UsmapVersion = UsmapVersion::ExplicitEnumValues;

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(UsmapVersion::Initial),
            1 => Some(UsmapVersion::PackageVersioning),
            2 => Some(UsmapVersion::LongFName),
            3 => Some(UsmapVersion::LargeEnums),
            4 => Some(UsmapVersion::ExplicitEnumValues),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Compression applied to the usmap body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMethod {
    None = 0,
    Oodle = 1,
    Brotli = 2,
    Zstd = 3,
}

impl CompressionMethod {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(CompressionMethod::None),
            1 => Some(CompressionMethod::Oodle),
            2 => Some(CompressionMethod::Brotli),
            3 => Some(CompressionMethod::Zstd),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CompressionMethod::None => "none",
            CompressionMethod::Oodle => "oodle",
            CompressionMethod::Brotli => "brotli",
            CompressionMethod::Zstd => "zstd",
        }
    }
}

/// Engine version block some usmap files carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageVersioning {
    pub file_version_ue4: i32,
    pub file_version_ue5: i32,
    pub licensee_version: i32,
    /// Custom version GUIDs and their versions
    pub custom_versions: Vec<([u8; 16], i32)>,
    pub net_cl: u32,
}

/// Engine property kinds, in on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Byte,
    Bool,
    Int,
    Float,
    Object,
    Name,
    Delegate,
    Double,
    Array,
    Struct,
    Str,
    Text,
    Interface,
    MulticastDelegate,
    WeakObject,
    LazyObject,
    AssetObject,
    SoftObject,
    UInt64,
    UInt32,
    UInt16,
    Int64,
    Int16,
    Int8,
    Map,
    Set,
    Enum,
    FieldPath,
    Optional,
    Utf8Str,
    AnsiStr,
    Unknown,
}

impl PropertyKind {
    const ORDERED: [PropertyKind; 31] = [
        PropertyKind::Byte,
        PropertyKind::Bool,
        PropertyKind::Int,
        PropertyKind::Float,
        PropertyKind::Object,
        PropertyKind::Name,
        PropertyKind::Delegate,
        PropertyKind::Double,
        PropertyKind::Array,
        PropertyKind::Struct,
        PropertyKind::Str,
        PropertyKind::Text,
        PropertyKind::Interface,
        PropertyKind::MulticastDelegate,
        PropertyKind::WeakObject,
        PropertyKind::LazyObject,
        PropertyKind::AssetObject,
        PropertyKind::SoftObject,
        PropertyKind::UInt64,
        PropertyKind::UInt32,
        PropertyKind::UInt16,
        PropertyKind::Int64,
        PropertyKind::Int16,
        PropertyKind::Int8,
        PropertyKind::Map,
        PropertyKind::Set,
        PropertyKind::Enum,
        PropertyKind::FieldPath,
        PropertyKind::Optional,
        PropertyKind::Utf8Str,
        PropertyKind::AnsiStr,
    ];

    /// Decode an on-disk kind byte. `0xFF` is [`PropertyKind::Unknown`].
    pub fn from_u8(value: u8) -> Option<Self> {
        if value == 0xFF {
            return Some(PropertyKind::Unknown);
        }
        Self::ORDERED.get(value as usize).copied()
    }

    /// Engine type name, e.g. `ArrayProperty`.
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::Byte => "ByteProperty",
            PropertyKind::Bool => "BoolProperty",
            PropertyKind::Int => "IntProperty",
            PropertyKind::Float => "FloatProperty",
            PropertyKind::Object => "ObjectProperty",
            PropertyKind::Name => "NameProperty",
            PropertyKind::Delegate => "DelegateProperty",
            PropertyKind::Double => "DoubleProperty",
            PropertyKind::Array => "ArrayProperty",
            PropertyKind::Struct => "StructProperty",
            PropertyKind::Str => "StrProperty",
            PropertyKind::Text => "TextProperty",
            PropertyKind::Interface => "InterfaceProperty",
            PropertyKind::MulticastDelegate => "MulticastDelegateProperty",
            PropertyKind::WeakObject => "WeakObjectProperty",
            PropertyKind::LazyObject => "LazyObjectProperty",
            PropertyKind::AssetObject => "AssetObjectProperty",
            PropertyKind::SoftObject => "SoftObjectProperty",
            PropertyKind::UInt64 => "UInt64Property",
            PropertyKind::UInt32 => "UInt32Property",
            PropertyKind::UInt16 => "UInt16Property",
            PropertyKind::Int64 => "Int64Property",
            PropertyKind::Int16 => "Int16Property",
            PropertyKind::Int8 => "Int8Property",
            PropertyKind::Map => "MapProperty",
            PropertyKind::Set => "SetProperty",
            PropertyKind::Enum => "EnumProperty",
            PropertyKind::FieldPath => "FieldPathProperty",
            PropertyKind::Optional => "OptionalProperty",
            PropertyKind::Utf8Str => "Utf8StrProperty",
            PropertyKind::AnsiStr => "AnsiStrProperty",
            PropertyKind::Unknown => "Unknown",
        }
    }
}

/// Structural description of one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaPropertyData {
    /// Any kind without nested type information
    Simple(PropertyKind),
    Enum {
        /// Underlying storage, usually `ByteProperty`
        inner: Box<SchemaPropertyData>,
        enum_name: String,
    },
    Struct {
        struct_type: String,
    },
    /// Array, set or optional
    Container {
        kind: PropertyKind,
        inner: Box<SchemaPropertyData>,
    },
    Map {
        key: Box<SchemaPropertyData>,
        value: Box<SchemaPropertyData>,
    },
}

impl SchemaPropertyData {
    pub fn kind(&self) -> PropertyKind {
        match self {
            SchemaPropertyData::Simple(kind) => *kind,
            SchemaPropertyData::Enum { .. } => PropertyKind::Enum,
            SchemaPropertyData::Struct { .. } => PropertyKind::Struct,
            SchemaPropertyData::Container { kind, .. } => *kind,
            SchemaPropertyData::Map { .. } => PropertyKind::Map,
        }
    }
}

/// A property slot of a schema struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaProperty {
    pub name: String,
    /// Position in the struct's unversioned property order
    pub schema_index: u16,
    /// Static array dimension, 1 for plain properties
    pub array_size: u8,
    pub data: SchemaPropertyData,
}

/// A struct or class definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaStruct {
    pub name: String,
    pub super_type: Option<String>,
    /// Total property count, static array slots included
    pub property_count: u16,
    /// Serialized properties
    pub properties: Vec<SchemaProperty>,
}

impl SchemaStruct {
    /// Find a property declared directly on this struct. Names compare
    /// case-insensitively, as engine names do.
    pub fn property(&self, name: &str) -> Option<&SchemaProperty> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

/// An enum definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEnum {
    pub name: String,
    /// Entries as `(value, name)`
    pub entries: Vec<(i64, String)>,
}

/// A parsed usmap schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    /// Label, usually the file name
    pub name: String,
    pub version: UsmapVersion,
    pub versioning: Option<PackageVersioning>,
    pub compression: CompressionMethod,
    /// The schema's own name table
    pub names: Vec<String>,
    pub enums: HashMap<String, SchemaEnum>,
    pub structs: HashMap<String, SchemaStruct>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: UsmapVersion::LATEST,
            versioning: None,
            compression: CompressionMethod::None,
            names: Vec::new(),
            enums: HashMap::new(),
            structs: HashMap::new(),
        }
    }

    pub fn add_struct(&mut self, def: SchemaStruct) {
        self.structs.insert(def.name.clone(), def);
    }

    pub fn add_enum(&mut self, def: SchemaEnum) {
        self.enums.insert(def.name.clone(), def);
    }

    pub fn get_struct(&self, name: &str) -> Option<&SchemaStruct> {
        self.structs.get(name)
    }

    pub fn get_enum(&self, name: &str) -> Option<&SchemaEnum> {
        self.enums.get(name)
    }
}
