// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use assetport::package::{ExportRecord, MeshLod, MeshRenderData, PackageSummary, StructuralSection};
use assetport::schema::{PropertyKind, SchemaPropertyData};
use assetport::{AssetDocument, ByteAsset, FormatEngine, PackageLayout, Result, Schema};

// ============================================================================
// Temporary Files
// ============================================================================

/// Get a temporary directory for test files
pub fn temp_dir(label: &str) -> PathBuf {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    std::env::temp_dir().join(format!(
        "assetport_{}_test_{}_{}",
        label,
        std::process::id(),
        random
    ))
}

/// Cleanup guard for test temporary files
#[derive(Debug)]
pub struct CleanupGuard(pub PathBuf);

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Create a fresh temporary directory with a cleanup guard
pub fn temp_workspace(label: &str) -> (PathBuf, CleanupGuard) {
    let dir = temp_dir(label);
    fs::create_dir_all(&dir).unwrap();
    let guard = CleanupGuard(dir.clone());
    (dir, guard)
}

// ============================================================================
// Usmap Builder
// ============================================================================

/// Builds usmap files in memory.
#[derive(Debug, Default)]
pub struct UsmapBuilder {
    names: Vec<String>,
    enums: Vec<(String, Vec<String>)>,
    structs: Vec<(String, Option<String>, Vec<(String, SchemaPropertyData)>)>,
}

impl UsmapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enum_def(mut self, name: &str, entries: &[&str]) -> Self {
        self.intern(name);
        for entry in entries {
            self.intern(entry);
        }
        self.enums.push((
            name.to_string(),
            entries.iter().map(|e| e.to_string()).collect(),
        ));
        self
    }

    pub fn struct_def(
        mut self,
        name: &str,
        super_type: Option<&str>,
        properties: Vec<(&str, SchemaPropertyData)>,
    ) -> Self {
        self.intern(name);
        if let Some(super_type) = super_type {
            self.intern(super_type);
        }
        let mut props = Vec::new();
        for (prop_name, data) in properties {
            self.intern(prop_name);
            self.intern_data(&data);
            props.push((prop_name.to_string(), data));
        }
        self.structs
            .push((name.to_string(), super_type.map(str::to_string), props));
        self
    }

    /// Latest-version body bytes.
    pub fn body(&self) -> Vec<u8> {
        let mut out = Vec::new();
        put_u32(&mut out, self.names.len() as u32);
        for name in &self.names {
            out.extend_from_slice(&(name.len() as u16).to_le_bytes());
            out.extend_from_slice(name.as_bytes());
        }

        put_u32(&mut out, self.enums.len() as u32);
        for (name, entries) in &self.enums {
            put_u32(&mut out, self.index(name));
            out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
            for (value, entry) in entries.iter().enumerate() {
                out.extend_from_slice(&(value as i64).to_le_bytes());
                put_u32(&mut out, self.index(entry));
            }
        }

        put_u32(&mut out, self.structs.len() as u32);
        for (name, super_type, props) in &self.structs {
            put_u32(&mut out, self.index(name));
            put_u32(
                &mut out,
                super_type.as_ref().map_or(u32::MAX, |s| self.index(s)),
            );
            out.extend_from_slice(&(props.len() as u16).to_le_bytes());
            out.extend_from_slice(&(props.len() as u16).to_le_bytes());
            for (i, (prop_name, data)) in props.iter().enumerate() {
                out.extend_from_slice(&(i as u16).to_le_bytes());
                out.push(1);
                put_u32(&mut out, self.index(prop_name));
                self.write_data(&mut out, data);
            }
        }
        out
    }

    /// An uncompressed version 4 file.
    pub fn build(&self) -> Vec<u8> {
        let body = self.body();
        file_bytes(0, &body, body.len())
    }

    /// A Zstandard-compressed version 4 file.
    pub fn build_zstd(&self) -> Vec<u8> {
        let body = self.body();
        let stored = zstd::bulk::compress(&body, 3).unwrap();
        file_bytes(3, &stored, body.len())
    }

    fn intern(&mut self, name: &str) {
        if !self.names.iter().any(|n| n == name) {
            self.names.push(name.to_string());
        }
    }

    fn intern_data(&mut self, data: &SchemaPropertyData) {
        match data {
            SchemaPropertyData::Simple(_) => {}
            SchemaPropertyData::Enum { inner, enum_name } => {
                self.intern_data(inner);
                self.intern(enum_name);
            }
            SchemaPropertyData::Struct { struct_type } => self.intern(struct_type),
            SchemaPropertyData::Container { inner, .. } => self.intern_data(inner),
            SchemaPropertyData::Map { key, value } => {
                self.intern_data(key);
                self.intern_data(value);
            }
        }
    }

    fn index(&self, name: &str) -> u32 {
        self.names.iter().position(|n| n == name).unwrap() as u32
    }

    fn write_data(&self, out: &mut Vec<u8>, data: &SchemaPropertyData) {
        out.push(kind_byte(data.kind()));
        match data {
            SchemaPropertyData::Simple(_) => {}
            SchemaPropertyData::Enum { inner, enum_name } => {
                self.write_data(out, inner);
                put_u32(out, self.index(enum_name));
            }
            SchemaPropertyData::Struct { struct_type } => put_u32(out, self.index(struct_type)),
            SchemaPropertyData::Container { inner, .. } => self.write_data(out, inner),
            SchemaPropertyData::Map { key, value } => {
                self.write_data(out, key);
                self.write_data(out, value);
            }
        }
    }
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

/// On-disk byte of a property kind.
pub fn kind_byte(kind: PropertyKind) -> u8 {
    if kind == PropertyKind::Unknown {
        return 0xFF;
    }
    (0u8..=u8::MAX)
        .find(|&b| PropertyKind::from_u8(b) == Some(kind))
        .unwrap()
}

/// Header of a version 4 file without package versioning.
pub fn file_bytes(compression: u8, stored: &[u8], decompressed: usize) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&0x30C4u16.to_le_bytes());
    out.push(4);
    out.extend_from_slice(&0i32.to_le_bytes());
    out.push(compression);
    put_u32(&mut out, stored.len() as u32);
    put_u32(&mut out, decompressed as u32);
    out.extend_from_slice(stored);
    out
}

pub fn struct_of(name: &str) -> SchemaPropertyData {
    SchemaPropertyData::Struct {
        struct_type: name.to_string(),
    }
}

pub fn array_of(inner: SchemaPropertyData) -> SchemaPropertyData {
    SchemaPropertyData::Container {
        kind: PropertyKind::Array,
        inner: Box::new(inner),
    }
}

pub fn enum_of(name: &str) -> SchemaPropertyData {
    SchemaPropertyData::Enum {
        inner: Box::new(SchemaPropertyData::Simple(PropertyKind::Byte)),
        enum_name: name.to_string(),
    }
}

/// Destination schema used across the integration tests.
pub fn destination_usmap() -> UsmapBuilder {
    UsmapBuilder::new()
        .enum_def("ECollisionResponse", &["ECR_Ignore", "ECR_Overlap", "ECR_Block"])
        .enum_def("ECollisionEnabled", &["NoCollision", "QueryOnly"])
        .struct_def("Object", None, vec![])
        .struct_def(
            "BodySetup",
            Some("Object"),
            vec![
                ("DefaultInstance", struct_of("BodyInstance")),
                ("AggGeom", struct_of("KAggregateGeom")),
            ],
        )
        .struct_def(
            "BodyInstance",
            None,
            vec![
                ("CollisionEnabled", enum_of("ECollisionEnabled")),
                ("CollisionResponses", struct_of("CollisionResponse")),
            ],
        )
        .struct_def(
            "CollisionResponse",
            None,
            vec![("ResponseArray", array_of(struct_of("ResponseChannel")))],
        )
        .struct_def(
            "StaticMesh",
            Some("Object"),
            vec![
                ("StaticMaterials", array_of(struct_of("StaticMaterial"))),
                ("Sockets", array_of(SchemaPropertyData::Simple(PropertyKind::Object))),
            ],
        )
}

pub fn destination_schema() -> Arc<Schema> {
    Arc::new(assetport::schema::read_schema("Augusta.usmap", &destination_usmap().build()).unwrap())
}

pub fn source_schema() -> Arc<Schema> {
    let bytes = UsmapBuilder::new()
        .struct_def("BodySetup", None, vec![])
        .build();
    Arc::new(assetport::schema::read_schema("Generic.usmap", &bytes).unwrap())
}

// ============================================================================
// Fixture Package
// ============================================================================

/// Size of the binary region at the front of a fixture header; the JSON
/// document follows it.
pub const HEADER_PREFIX: usize = 64;

/// Header positions of the fixture export table.
pub const MESH_SIZE_POS: u64 = 0;
pub const BODY_SIZE_POS: u64 = 16;
pub const NAV_SIZE_POS: u64 = 32;
pub const BULK_POS: u64 = 48;

pub const MESH_SIZE: i64 = 500;
pub const BODY_OFFSET: i64 = 500;
pub const NAV_OFFSET: i64 = 550;
pub const BULK_OFFSET: i64 = 600;
pub const PAYLOAD_LEN: usize = 600;

/// Document carried by fixture packages.
pub const FIXTURE_DOCUMENT: &str = r#"{
    "names": ["None", "SM_Rock", "StaticMesh", "BodySetup"],
    "object_version_ue5": 1012,
    "has_unversioned_properties": false,
    "exports": [
        {
            "object_name": "SM_Rock",
            "class_name": "StaticMesh",
            "properties": [
                {
                    "name": "StaticMaterials",
                    "value": { "type": "array", "element_type": "StructProperty" }
                },
                {
                    "name": "LightMapResolution",
                    "value": { "type": "simple", "property_type": "IntProperty", "value": { "int": 64 } }
                }
            ]
        },
        {
            "object_name": "BodySetup",
            "class_name": "BodySetup",
            "properties": [
                {
                    "name": "DefaultInstance",
                    "value": {
                        "type": "struct",
                        "struct_type": "BodyInstance",
                        "fields": [
                            {
                                "name": "CollisionEnabled",
                                "value": { "type": "enum", "enum_type": "ECollisionEnabled", "value": "QueryOnly" }
                            },
                            {
                                "name": "CollisionProfileName",
                                "value": { "type": "simple", "property_type": "NameProperty", "value": { "name": "BlockAll" } }
                            }
                        ]
                    }
                }
            ]
        },
        { "object_name": "NavCollision", "class_name": "NavCollision" }
    ]
}"#;

/// A format engine over fixture packages.
///
/// The header starts with a binary export table of [`HEADER_PREFIX`] bytes
/// followed by the document as JSON. Layout positions and section offsets
/// come from the template; field values are read from the header bytes.
#[derive(Debug, Clone)]
pub struct FixtureEngine {
    pub template: PackageLayout,
}

impl FixtureEngine {
    pub fn new(sections: &[u64]) -> Self {
        Self {
            template: fixture_layout(sections),
        }
    }
}

fn read_i64(bytes: &[u8], pos: u64) -> i64 {
    let pos = pos as usize;
    i64::from_le_bytes(bytes[pos..pos + 8].try_into().unwrap())
}

impl FormatEngine for FixtureEngine {
    fn read_layout(&self, header: &ByteAsset, _payload: &ByteAsset) -> Result<PackageLayout> {
        let bytes = header.bytes();
        let mut layout = self.template.clone();
        for export in &mut layout.exports {
            export.serial_size = read_i64(bytes, export.serial_size_offset);
            export.serial_offset = read_i64(bytes, export.serial_offset_pos().unwrap());
        }
        layout.summary.bulk_data_start_offset =
            read_i64(bytes, layout.summary.bulk_data_start_offset_pos);
        Ok(layout)
    }

    fn read_document(
        &self,
        header: &ByteAsset,
        _payload: &ByteAsset,
        schema: Arc<Schema>,
    ) -> Result<AssetDocument> {
        let mut document = AssetDocument::from_json(&header.bytes()[HEADER_PREFIX..])?;
        document.set_schema(schema);
        Ok(document)
    }

    fn write_document(
        &self,
        document: &AssetDocument,
        header: &ByteAsset,
        payload: &ByteAsset,
    ) -> Result<(ByteAsset, ByteAsset)> {
        let mut bytes = header.bytes()[..HEADER_PREFIX].to_vec();
        bytes.extend_from_slice(&document.to_json()?);
        Ok((header.with_bytes(bytes), payload.clone()))
    }
}

fn record(name: &str, class: &str, size_pos: u64, sections: Option<&[u64]>) -> ExportRecord {
    ExportRecord {
        object_name: name.to_string(),
        class_name: class.to_string(),
        serial_size_offset: size_pos,
        serial_offset: 0,
        serial_size: 0,
        render_data: sections.map(|offsets| MeshRenderData {
            lods: vec![MeshLod {
                sections: offsets
                    .iter()
                    .map(|&padding_offset| StructuralSection { padding_offset })
                    .collect(),
            }],
        }),
    }
}

/// Layout template of the fixture package.
pub fn fixture_layout(sections: &[u64]) -> PackageLayout {
    PackageLayout {
        exports: vec![
            record("SM_Rock", "StaticMesh", MESH_SIZE_POS, Some(sections)),
            record("BodySetup", "BodySetup", BODY_SIZE_POS, None),
            record("NavCollision", "NavCollision", NAV_SIZE_POS, None),
        ],
        summary: PackageSummary {
            bulk_data_start_offset: 0,
            bulk_data_start_offset_pos: BULK_POS,
        },
    }
}

/// Layout of the fixture package with its field values filled in.
pub fn fixture_layout_with_values(sections: &[u64]) -> PackageLayout {
    let mut layout = fixture_layout(sections);
    layout.exports[0].serial_size = MESH_SIZE;
    layout.exports[1].serial_offset = BODY_OFFSET;
    layout.exports[1].serial_size = NAV_OFFSET - BODY_OFFSET;
    layout.exports[2].serial_offset = NAV_OFFSET;
    layout.exports[2].serial_size = BULK_OFFSET - NAV_OFFSET;
    layout.summary.bulk_data_start_offset = BULK_OFFSET;
    layout
}

/// Header and payload of the fixture package.
pub fn fixture_package() -> (ByteAsset, ByteAsset) {
    let mut header = vec![0u8; HEADER_PREFIX];
    let mut put = |pos: u64, value: i64| {
        let pos = pos as usize;
        header[pos..pos + 8].copy_from_slice(&value.to_le_bytes());
    };
    put(MESH_SIZE_POS, MESH_SIZE);
    put(MESH_SIZE_POS + 8, 0);
    put(BODY_SIZE_POS, NAV_OFFSET - BODY_OFFSET);
    put(BODY_SIZE_POS + 8, BODY_OFFSET);
    put(NAV_SIZE_POS, BULK_OFFSET - NAV_OFFSET);
    put(NAV_SIZE_POS + 8, NAV_OFFSET);
    put(BULK_POS, BULK_OFFSET);
    header.extend_from_slice(FIXTURE_DOCUMENT.as_bytes());

    let payload: Vec<u8> = (0..PAYLOAD_LEN).map(|i| (i % 251) as u8 + 2).collect();
    (
        ByteAsset::new("SM_Rock.uasset", header),
        ByteAsset::new("SM_Rock.uexp", payload),
    )
}

/// Read the i64 at `pos` of an asset.
pub fn i64_at(asset: &ByteAsset, pos: u64) -> i64 {
    read_i64(asset.bytes(), pos)
}
