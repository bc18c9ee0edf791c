// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! End-to-end conversion through [`AssetConverter`].

mod common;

use std::fs;

use assetport::package::{backup_path, payload_path};
use assetport::transform::SkipReason;
use assetport::{AssetConverter, ByteAsset, ConvertOptions, FormatEngine, PortError};

use common::*;

fn converter(sections: &[u64]) -> AssetConverter<FixtureEngine> {
    AssetConverter::new(FixtureEngine::new(sections), source_schema(), destination_schema())
}

#[test]
fn test_convert_runs_every_stage() {
    let (header, payload) = fixture_package();
    let converter = converter(&[100, 250, 400]);
    let output = converter.convert(&header, &payload).unwrap();

    let stats = &output.stats;
    assert_eq!(stats.sections_padded, 3);
    assert_eq!(stats.size_increase, 12);
    assert_eq!(stats.exports_shifted, 2);
    assert!(stats.names_added > 0);
    assert_eq!(stats.type_names_populated, 21);
    assert_eq!(stats.placeholders, 0);
    assert!(stats.type_names_skipped.is_none());

    assert_eq!(output.payload.len(), payload.len() + 12);
    assert_eq!(i64_at(&output.header, MESH_SIZE_POS), MESH_SIZE + 12);
    assert_eq!(i64_at(&output.header, BULK_POS), BULK_OFFSET + 12);

    let document = converter
        .engine()
        .read_document(&output.header, &output.payload, destination_schema())
        .unwrap();
    let (_, body) = document.find_export("BodySetup").unwrap();
    let instance = body.property("DefaultInstance").unwrap();
    assert!(instance.field("CollisionResponses").is_some());
    assert!(instance.field("CollisionProfileName").is_none());
    assert_eq!(
        instance.type_name.as_ref().unwrap().to_string(),
        "StructProperty(1) -> BodyInstance(0)"
    );
}

#[test]
fn test_zero_sections_still_rewrites() {
    let (header, payload) = fixture_package();
    let output = converter(&[]).convert(&header, &payload).unwrap();

    assert_eq!(output.stats.sections_padded, 0);
    assert_eq!(output.stats.size_increase, 0);
    assert_eq!(output.payload.bytes(), payload.bytes());
    assert_eq!(&output.header.bytes()[..HEADER_PREFIX], &header.bytes()[..HEADER_PREFIX]);
    assert_ne!(output.header.bytes(), header.bytes());
    assert_eq!(output.stats.type_names_populated, 21);
}

#[test]
fn test_padding_can_be_disabled() {
    let (header, payload) = fixture_package();
    let options = ConvertOptions::default()
        .with_padding(false)
        .with_type_names(false);
    let converter = AssetConverter::with_options(
        FixtureEngine::new(&[100]),
        source_schema(),
        destination_schema(),
        options,
    );
    let output = converter.convert(&header, &payload).unwrap();

    assert_eq!(output.stats.sections_padded, 0);
    assert_eq!(output.stats.type_names_populated, 0);
    assert_eq!(output.payload.bytes(), payload.bytes());
}

#[test]
fn test_legacy_document_skips_type_names() {
    let (header, payload) = fixture_package();
    let legacy = FIXTURE_DOCUMENT.replace("\"object_version_ue5\": 1012", "\"object_version_ue5\": 1004");
    let mut bytes = header.bytes()[..HEADER_PREFIX].to_vec();
    bytes.extend_from_slice(legacy.as_bytes());
    let header = ByteAsset::new("SM_Legacy.uasset", bytes);

    let output = converter(&[100]).convert(&header, &payload).unwrap();
    assert_eq!(output.stats.type_names_skipped, Some(SkipReason::LegacyVersion(1004)));
    assert_eq!(output.stats.type_names_populated, 0);
    assert_eq!(output.stats.sections_padded, 1);
}

#[test]
fn test_missing_body_setup_fails_after_padding_plan() {
    let (header, payload) = fixture_package();
    let document = FIXTURE_DOCUMENT.replace("\"object_name\": \"BodySetup\"", "\"object_name\": \"BodySetup_Old\"");
    let mut bytes = header.bytes()[..HEADER_PREFIX].to_vec();
    bytes.extend_from_slice(document.as_bytes());
    let header = ByteAsset::new("SM_Rock.uasset", bytes);

    let err = converter(&[100]).convert(&header, &payload).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_convert_in_place_with_backups() {
    let (dir, _guard) = temp_workspace("convert_in_place");
    let (header, payload) = fixture_package();
    let header_path = dir.join("SM_Rock.uasset");
    header.write(&header_path).unwrap();
    payload.write(payload_path(&header_path)).unwrap();

    let stats = converter(&[100, 250, 400])
        .convert_in_place(&header_path, true)
        .unwrap();
    assert_eq!(stats.size_increase, 12);

    let payload_on_disk = fs::read(payload_path(&header_path)).unwrap();
    assert_eq!(payload_on_disk.len(), PAYLOAD_LEN + 12);
    assert_eq!(fs::read(backup_path(&header_path)).unwrap(), header.bytes());
    assert_eq!(
        fs::read(backup_path(&payload_path(&header_path))).unwrap(),
        payload.bytes()
    );
}

#[test]
fn test_convert_in_place_without_payload() {
    let (dir, _guard) = temp_workspace("convert_no_payload");
    let (header, _) = fixture_package();
    let header_path = dir.join("SM_Rock.uasset");
    header.write(&header_path).unwrap();

    let err = converter(&[]).convert_in_place(&header_path, false).unwrap_err();
    assert!(matches!(err, PortError::Io(_)));
    assert!(!backup_path(&header_path).exists());
}

#[test]
fn test_engine_by_reference() {
    let engine = FixtureEngine::new(&[100]);
    let converter = AssetConverter::new(&engine, source_schema(), destination_schema());
    let (header, payload) = fixture_package();
    assert_eq!(converter.convert(&header, &payload).unwrap().stats.sections_padded, 1);
}
