// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Section padding for static mesh payloads.
//!
//! Newer schema revisions expect a 4-byte field in front of every static
//! mesh section. Inserting it grows the mesh export, so the header blob has
//! to follow:
//! - the mesh export's serial size grows by the total inserted length
//! - every export declared after the mesh export moves by the same amount
//! - the bulk-data start offset moves too, when the package has bulk data
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use assetport::package::PackageLayout;
//! use assetport::transform::MeshPadder;
//! use assetport::ByteAsset;
//!
//! let header = ByteAsset::read("SM_Rock.uasset")?;
//! let payload = ByteAsset::read("SM_Rock.uexp")?;
//! let layout = PackageLayout::from_json(&std::fs::read("SM_Rock.layout.json")?)?;
//!
//! let padded = MeshPadder::new().pad(&header, &payload, &layout)?;
//! println!("grew by {} bytes", padded.plan.size_increase);
//! # Ok(())
//! # }
//! ```

use byteorder::{ByteOrder, LittleEndian};
use tracing::{debug, info};

use crate::core::{ByteAsset, PortError, Result};
use crate::package::{PackageLayout, STATIC_MESH_CLASS};

/// Pattern inserted in front of every mesh section: little-endian `1i32`.
pub const SECTION_PADDING: [u8; 4] = [1, 0, 0, 0];

/// Options for padding.
#[derive(Debug, Clone)]
pub struct PadOptions {
    /// Bytes inserted before each section
    pub pattern: Vec<u8>,
    /// Class name of the export whose sections are padded
    pub mesh_class: String,
}

impl Default for PadOptions {
    fn default() -> Self {
        Self {
            pattern: SECTION_PADDING.to_vec(),
            mesh_class: STATIC_MESH_CLASS.to_string(),
        }
    }
}

impl PadOptions {
    /// Use a different padding pattern.
    pub fn with_pattern(mut self, pattern: impl Into<Vec<u8>>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Pad the sections of a different export class.
    pub fn with_mesh_class(mut self, class: impl Into<String>) -> Self {
        self.mesh_class = class.into();
        self
    }
}

/// Every edit padding makes, computed from the unpadded layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaddingPlan {
    /// Index of the padded export in the export table
    pub mesh_index: usize,
    /// Payload offsets of the sections before padding
    pub section_offsets: Vec<u64>,
    /// Offsets in the growing payload where each pattern lands
    pub insertion_points: Vec<u64>,
    /// Total bytes inserted
    pub size_increase: i64,
    /// Header fields padding rewrites
    pub header_edits: Vec<HeaderEdit>,
    /// Number of exports declared after the padded one
    pub exports_shifted: usize,
    /// Whether the bulk-data start offset moves
    pub bulk_data_shifted: bool,
}

/// One 8-byte header field rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderEdit {
    /// What the field is, for error messages
    pub field: String,
    /// Header position of the field
    pub position: u64,
    pub before: i64,
    pub after: i64,
}

/// Result of padding a package.
#[derive(Debug, Clone)]
pub struct PaddedPackage {
    pub header: ByteAsset,
    pub payload: ByteAsset,
    pub plan: PaddingPlan,
}

/// Inserts padding before mesh sections and keeps the header consistent.
#[derive(Debug, Clone, Default)]
pub struct MeshPadder {
    options: PadOptions,
}

impl MeshPadder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: PadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PadOptions {
        &self.options
    }

    /// Work out every edit without touching any bytes.
    pub fn plan(&self, layout: &PackageLayout) -> Result<PaddingPlan> {
        let pattern_len = self.options.pattern.len() as u64;
        if pattern_len == 0 {
            return Err(PortError::invariant_violation(
                "padding pattern must not be empty",
            ));
        }

        let (mesh_index, mesh) = layout
            .last_export_of_class(&self.options.mesh_class)
            .ok_or_else(|| {
                PortError::not_found(
                    format!("{} export", self.options.mesh_class),
                    "package export table",
                )
            })?;

        let section_offsets: Vec<u64> = mesh.sections().map(|s| s.padding_offset).collect();
        if let Some(pair) = section_offsets.windows(2).find(|w| w[1] < w[0]) {
            return Err(PortError::invariant_violation(format!(
                "section offsets must not decrease ({} follows {})",
                pair[1], pair[0]
            )));
        }

        let insertion_points = section_offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| {
                (i as u64)
                    .checked_mul(pattern_len)
                    .and_then(|shift| offset.checked_add(shift))
                    .ok_or_else(|| unaddressable("mesh section", offset))
            })
            .collect::<Result<Vec<u64>>>()?;

        let size_increase = pattern_len
            .checked_mul(section_offsets.len() as u64)
            .and_then(|total| i64::try_from(total).ok())
            .ok_or_else(|| PortError::invariant_violation("padding size overflows i64"))?;

        let mut plan = PaddingPlan {
            mesh_index,
            section_offsets,
            insertion_points,
            size_increase,
            ..PaddingPlan::default()
        };
        if size_increase == 0 {
            return Ok(plan);
        }

        plan.header_edits.push(HeaderEdit {
            field: format!("serial size of export {mesh_index}"),
            position: mesh.serial_size_offset,
            before: mesh.serial_size,
            after: grow(mesh.serial_size, size_increase)?,
        });

        for (index, export) in layout.exports.iter().enumerate().skip(mesh_index + 1) {
            plan.header_edits.push(HeaderEdit {
                field: format!("serial offset of export {index}"),
                position: export
                    .serial_offset_pos()
                    .ok_or_else(|| unaddressable("export serial offset", export.serial_size_offset))?,
                before: export.serial_offset,
                after: grow(export.serial_offset, size_increase)?,
            });
            plan.exports_shifted += 1;
        }

        let summary = &layout.summary;
        if summary.bulk_data_start_offset > 0 {
            plan.header_edits.push(HeaderEdit {
                field: "bulk data start offset".to_string(),
                position: summary.bulk_data_start_offset_pos,
                before: summary.bulk_data_start_offset,
                after: grow(summary.bulk_data_start_offset, size_increase)?,
            });
            plan.bulk_data_shifted = true;
        }

        Ok(plan)
    }

    /// Pad every section of the mesh export.
    ///
    /// With no sections the input is returned unchanged.
    pub fn pad(
        &self,
        header: &ByteAsset,
        payload: &ByteAsset,
        layout: &PackageLayout,
    ) -> Result<PaddedPackage> {
        let plan = self.plan(layout)?;
        if plan.section_offsets.is_empty() {
            info!(
                context = "pad",
                asset = %payload.name(),
                "No mesh sections, package left unchanged"
            );
            return Ok(PaddedPackage {
                header: header.clone(),
                payload: payload.clone(),
                plan,
            });
        }

        let source = payload.bytes();
        let pattern = &self.options.pattern;
        let mut padded = Vec::with_capacity(source.len() + plan.size_increase as usize);
        let mut copied = 0usize;

        for (&offset, &point) in plan.section_offsets.iter().zip(&plan.insertion_points) {
            let offset = checked_index(offset, source.len(), "mesh section")?;
            padded.extend_from_slice(&source[copied..offset]);
            padded.extend_from_slice(pattern);
            copied = offset;
            debug!(
                context = "pad",
                section_offset = offset,
                insertion_point = point,
                "Inserted section padding"
            );
        }
        padded.extend_from_slice(&source[copied..]);

        let mut header_bytes = header.bytes().to_vec();
        for edit in &plan.header_edits {
            write_i64(&mut header_bytes, edit.position, edit.after, &edit.field)?;
        }

        info!(
            context = "pad",
            asset = %payload.name(),
            sections = plan.section_offsets.len(),
            size_increase = plan.size_increase,
            exports_shifted = plan.exports_shifted,
            bulk_data_shifted = plan.bulk_data_shifted,
            "Padded mesh sections"
        );

        Ok(PaddedPackage {
            header: header.with_bytes(header_bytes),
            payload: payload.with_bytes(padded),
            plan,
        })
    }

    /// Undo [`MeshPadder::pad`].
    ///
    /// `layout` is the layout of the unpadded package. Every removed span
    /// must hold the padding pattern.
    pub fn unpad(
        &self,
        header: &ByteAsset,
        payload: &ByteAsset,
        layout: &PackageLayout,
    ) -> Result<PaddedPackage> {
        let plan = self.plan(layout)?;
        if plan.section_offsets.is_empty() {
            return Ok(PaddedPackage {
                header: header.clone(),
                payload: payload.clone(),
                plan,
            });
        }

        let source = payload.bytes();
        let pattern = &self.options.pattern;
        let mut unpadded = Vec::with_capacity(source.len().saturating_sub(plan.size_increase as usize));
        let mut copied = 0usize;

        for &point in &plan.insertion_points {
            let start = checked_index(point, source.len(), "padding")?;
            let end = start + pattern.len();
            if end > source.len() {
                return Err(PortError::offset_out_of_range("padding", end as u64, source.len()));
            }
            if &source[start..end] != pattern.as_slice() {
                return Err(PortError::invariant_violation(format!(
                    "bytes at payload offset {start} are not the padding pattern"
                )));
            }
            unpadded.extend_from_slice(&source[copied..start]);
            copied = end;
        }
        unpadded.extend_from_slice(&source[copied..]);

        let mut header_bytes = header.bytes().to_vec();
        for edit in &plan.header_edits {
            write_i64(&mut header_bytes, edit.position, edit.before, &edit.field)?;
        }

        info!(
            context = "unpad",
            asset = %payload.name(),
            sections = plan.section_offsets.len(),
            size_decrease = plan.size_increase,
            "Removed mesh section padding"
        );

        Ok(PaddedPackage {
            header: header.with_bytes(header_bytes),
            payload: payload.with_bytes(unpadded),
            plan,
        })
    }
}

fn grow(value: i64, by: i64) -> Result<i64> {
    value
        .checked_add(by)
        .ok_or_else(|| PortError::invariant_violation(format!("{value} + {by} overflows i64")))
}

/// A position that does not fit in any buffer.
fn unaddressable(field: &str, offset: u64) -> PortError {
    PortError::offset_out_of_range(field, offset, usize::MAX)
}

fn checked_index(offset: u64, len: usize, field: &str) -> Result<usize> {
    usize::try_from(offset)
        .ok()
        .filter(|&o| o <= len)
        .ok_or_else(|| PortError::offset_out_of_range(field, offset, len))
}

/// Overwrite an 8-byte little-endian field.
fn write_i64(buf: &mut [u8], position: u64, value: i64, field: &str) -> Result<()> {
    let len = buf.len();
    let start = usize::try_from(position)
        .ok()
        .filter(|&p| p.checked_add(8).is_some_and(|end| end <= len))
        .ok_or_else(|| PortError::offset_out_of_range(field, position, len))?;
    LittleEndian::write_i64(&mut buf[start..start + 8], value);
    Ok(())
}
