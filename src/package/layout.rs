// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Export table layout of a package.
//!
//! The layout is the slice of the engine's object graph the padder needs:
//! where each export's size and offset fields sit in the header blob, and
//! where each mesh section starts in the payload blob.

use serde::{Deserialize, Serialize};

use crate::core::Result;

/// Class name of the export that owns the mesh sections.
pub const STATIC_MESH_CLASS: &str = "StaticMesh";

/// Distance from an export's serial-size field to its serial-offset field.
pub const SERIAL_OFFSET_DISTANCE: u64 = 8;

/// A sub-record of a mesh export's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralSection {
    /// Payload-relative offset at which padding belongs
    pub padding_offset: u64,
}

/// One level of detail of a mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshLod {
    #[serde(default)]
    pub sections: Vec<StructuralSection>,
}

/// Render data of a mesh export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshRenderData {
    #[serde(default)]
    pub lods: Vec<MeshLod>,
}

/// Header metadata of one serialized object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub object_name: String,
    pub class_name: String,
    /// Header position of the 8-byte serial-size field; the serial-offset
    /// field follows it directly
    pub serial_size_offset: u64,
    pub serial_offset: i64,
    pub serial_size: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_data: Option<MeshRenderData>,
}

impl ExportRecord {
    /// Header position of the serial-offset field, `None` if it cannot be
    /// addressed.
    pub fn serial_offset_pos(&self) -> Option<u64> {
        self.serial_size_offset.checked_add(SERIAL_OFFSET_DISTANCE)
    }

    /// Sections across all LODs, LOD by LOD.
    pub fn sections(&self) -> impl Iterator<Item = &StructuralSection> {
        self.render_data
            .iter()
            .flat_map(|rd| rd.lods.iter())
            .flat_map(|lod| lod.sections.iter())
    }
}

/// Package summary fields the padder maintains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSummary {
    /// Start of bulk data; only maintained when positive
    #[serde(default)]
    pub bulk_data_start_offset: i64,
    /// Header position of the bulk-data start offset field
    #[serde(default)]
    pub bulk_data_start_offset_pos: u64,
}

/// Exports in declaration order plus the summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLayout {
    pub exports: Vec<ExportRecord>,
    #[serde(default)]
    pub summary: PackageSummary,
}

impl PackageLayout {
    /// Parse a layout from JSON.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Serialize the layout as pretty-printed JSON.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// The mesh export and its index. When several exist the last one wins.
    pub fn mesh_export(&self) -> Option<(usize, &ExportRecord)> {
        self.last_export_of_class(STATIC_MESH_CLASS)
    }

    /// The last export of `class_name` and its index.
    pub fn last_export_of_class(&self, class_name: &str) -> Option<(usize, &ExportRecord)> {
        self.exports
            .iter()
            .enumerate()
            .rev()
            .find(|(_, e)| e.class_name == class_name)
    }
}
