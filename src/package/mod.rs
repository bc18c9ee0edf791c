// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Package structure as seen through a format engine.
//!
//! - [`layout`] - export table offsets and mesh sections
//! - [`document`] - exports with property trees, names and schema overlay
//! - [`ancestry`] - enclosing struct chains for schema lookups
//! - [`engine`] - the [`FormatEngine`] trait external parsers implement

pub mod ancestry;
pub mod document;
pub mod engine;
pub mod layout;

use std::path::{Path, PathBuf};

pub use ancestry::{resolve_ancestries, MAX_PROPERTY_DEPTH};
pub use document::{AssetDocument, ObjectExport, PROPERTY_TAG_COMPLETE_TYPE_NAME};
pub use engine::FormatEngine;
pub use layout::{
    ExportRecord, MeshLod, MeshRenderData, PackageLayout, PackageSummary, StructuralSection,
    STATIC_MESH_CLASS,
};

/// Payload blob path for a header blob path (`.uasset` -> `.uexp`).
pub fn payload_path(header_path: &Path) -> PathBuf {
    header_path.with_extension("uexp")
}

/// Backup path for a package file (`X.uasset` -> `X.uasset.bak`).
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_path() {
        assert_eq!(
            payload_path(Path::new("Meshes/SM_Rock.uasset")),
            PathBuf::from("Meshes/SM_Rock.uexp")
        );
        assert_eq!(payload_path(Path::new("SM_Rock")), PathBuf::from("SM_Rock.uexp"));
    }

    #[test]
    fn test_backup_path() {
        assert_eq!(
            backup_path(Path::new("Meshes/SM_Rock.uasset")),
            PathBuf::from("Meshes/SM_Rock.uasset.bak")
        );
        assert_eq!(
            backup_path(Path::new("SM_Rock.uexp")),
            PathBuf::from("SM_Rock.uexp.bak")
        );
    }
}
