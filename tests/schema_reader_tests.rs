// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Usmap reading, caching and lookups.

mod common;

use std::fs;
use std::sync::Arc;

use assetport::core::{Ancestry, FName};
use assetport::schema::{
    read_schema, read_schema_file, CompressionMethod, PropertyKind, SchemaPropertyData, UsmapVersion,
};
use assetport::{PortError, SchemaLookup, SchemaRegistry};

use common::*;

fn ancestry(owner: &str) -> Ancestry {
    Ancestry::from_chain(vec![FName::detached(owner)])
}

#[test]
fn test_destination_schema_contents() {
    let schema = read_schema("Augusta.usmap", &destination_usmap().build()).unwrap();
    assert_eq!(schema.version, UsmapVersion::LATEST);
    assert_eq!(schema.compression, CompressionMethod::None);
    assert!(schema.versioning.is_none());

    let responses = schema.get_enum("ECollisionResponse").unwrap();
    assert_eq!(
        responses.entries,
        vec![
            (0, "ECR_Ignore".to_string()),
            (1, "ECR_Overlap".to_string()),
            (2, "ECR_Block".to_string()),
        ]
    );

    let body_setup = schema.get_struct("BodySetup").unwrap();
    assert_eq!(body_setup.super_type.as_deref(), Some("Object"));
    assert_eq!(body_setup.properties.len(), 2);
    assert!(schema.get_struct("Object").unwrap().super_type.is_none());
}

#[test]
fn test_zstd_and_plain_agree() {
    let builder = destination_usmap();
    let plain = read_schema("plain", &builder.build()).unwrap();
    let packed = read_schema("packed", &builder.build_zstd()).unwrap();

    assert_eq!(packed.compression, CompressionMethod::Zstd);
    assert_eq!(plain.names, packed.names);
    assert_eq!(plain.structs, packed.structs);
    assert_eq!(plain.enums, packed.enums);
}

#[test]
fn test_lookups_by_ancestry() {
    let schema = read_schema("Augusta.usmap", &destination_usmap().build()).unwrap();

    assert_eq!(
        schema.struct_type("DefaultInstance", &ancestry("BodySetup")),
        Some("BodyInstance")
    );
    assert_eq!(
        schema.enum_name("CollisionEnabled", &ancestry("BodyInstance")),
        Some("ECollisionEnabled")
    );
    assert_eq!(
        schema.container_inner("Sockets", &ancestry("StaticMesh")),
        Some(&SchemaPropertyData::Simple(PropertyKind::Object))
    );
    assert!(schema.property_data("Sockets", &ancestry("BodySetup")).is_none());
    assert!(schema.property_data("Sockets", &ancestry("Unknown")).is_none());
}

#[test]
fn test_map_property_round_trips() {
    let bytes = UsmapBuilder::new()
        .struct_def(
            "Table",
            None,
            vec![(
                "Rows",
                SchemaPropertyData::Map {
                    key: Box::new(SchemaPropertyData::Simple(PropertyKind::Name)),
                    value: Box::new(struct_of("TableRow")),
                },
            )],
        )
        .build();
    let schema = read_schema("table", &bytes).unwrap();
    let (key, value) = schema.map_types("Rows", &ancestry("Table")).unwrap();
    assert_eq!(*key, SchemaPropertyData::Simple(PropertyKind::Name));
    assert_eq!(*value, struct_of("TableRow"));
}

#[test]
fn test_registry_loads_once() {
    let (dir, _guard) = temp_workspace("schema_registry");
    let path = dir.join("Augusta.usmap");
    fs::write(&path, destination_usmap().build()).unwrap();

    let registry = SchemaRegistry::new();
    let first = registry.load(&path).unwrap();
    fs::remove_file(&path).unwrap();
    let second = registry.load(&path).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.name, "Augusta.usmap");
    assert_eq!(registry.len().unwrap(), 1);
}

#[test]
fn test_missing_file_is_io_error() {
    let (dir, _guard) = temp_workspace("schema_missing");
    let err = read_schema_file(dir.join("absent.usmap")).unwrap_err();
    assert!(matches!(err, PortError::Io(_)));
}

#[test]
fn test_unsupported_compression() {
    let body = destination_usmap().body();
    for method in [1u8, 2u8] {
        let err = read_schema("odd", &file_bytes(method, &body, body.len())).unwrap_err();
        assert!(matches!(err, PortError::Unsupported { .. }), "method {method}: {err}");
    }
}

#[test]
fn test_truncated_body() {
    let bytes = destination_usmap().build();
    let err = read_schema("short", &bytes[..bytes.len() - 3]).unwrap_err();
    assert!(matches!(err, PortError::BufferTooShort { .. }), "{err}");
}
