// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Pad command - insert section padding into a package on disk.

use std::fs;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;

use crate::common::{output_json_or, Config, Result};
use assetport::package::{backup_path, payload_path, PackageLayout};
use assetport::transform::{MeshPadder, PadOptions};
use assetport::ByteAsset;

/// Pad the static mesh sections of a package.
#[derive(Args, Clone, Debug)]
pub struct PadCmd {
    /// Header blob; the payload is the `.uexp` next to it
    #[arg(value_name = "UASSET")]
    input: PathBuf,

    /// Export layout as JSON
    #[arg(long, value_name = "LAYOUT")]
    layout: PathBuf,

    /// Remove padding instead of inserting it
    #[arg(long)]
    reverse: bool,

    /// Class name of the export whose sections are padded
    #[arg(long, value_name = "CLASS")]
    mesh_class: Option<String>,

    /// Replace files without keeping `.bak` copies
    #[arg(long)]
    no_backup: bool,

    /// Output the plan as JSON
    #[arg(short, long)]
    json: bool,
}

impl PadCmd {
    pub fn run(self, config: &Config) -> Result<()> {
        let header_path = self.input;
        let payload_path = payload_path(&header_path);

        let header = ByteAsset::read(&header_path)
            .with_context(|| format!("Failed to read {}", header_path.display()))?;
        let payload = ByteAsset::read(&payload_path)
            .with_context(|| format!("Failed to read {}", payload_path.display()))?;
        let layout_bytes = fs::read(&self.layout)
            .with_context(|| format!("Failed to read layout {}", self.layout.display()))?;
        let layout = PackageLayout::from_json(&layout_bytes)
            .with_context(|| format!("Invalid layout {}", self.layout.display()))?;

        let mut options = PadOptions::default();
        if let Some(class) = self.mesh_class {
            options = options.with_mesh_class(class);
        }
        let padder = MeshPadder::with_options(options);
        let result = if self.reverse {
            padder.unpad(&header, &payload, &layout)?
        } else {
            padder.pad(&header, &payload, &layout)?
        };

        if config.output.backup && !self.no_backup {
            header.write(backup_path(&header_path))?;
            payload.write(backup_path(&payload_path))?;
        }
        result.header.write(&header_path)?;
        result.payload.write(&payload_path)?;

        let plan = &result.plan;
        let summary = PadSummary {
            header: header_path.display().to_string(),
            payload: payload_path.display().to_string(),
            reversed: self.reverse,
            sections: plan.section_offsets.len(),
            insertion_points: plan.insertion_points.clone(),
            size_increase: plan.size_increase,
            exports_shifted: plan.exports_shifted,
            bulk_data_shifted: plan.bulk_data_shifted,
        };

        output_json_or(self.json, &summary, || {
            let verb = if summary.reversed { "Unpadded" } else { "Padded" };
            println!(
                "{verb} {} section(s) in {} ({:+} bytes)",
                summary.sections,
                summary.payload,
                if summary.reversed {
                    -summary.size_increase
                } else {
                    summary.size_increase
                }
            );
            println!("  Exports shifted:  {}", summary.exports_shifted);
            println!("  Bulk data moved:  {}", summary.bulk_data_shifted);
            Ok(())
        })
    }
}

#[derive(Serialize)]
struct PadSummary {
    header: String,
    payload: String,
    reversed: bool,
    sections: usize,
    insertion_points: Vec<u64>,
    size_increase: i64,
    exports_shifted: usize,
    bulk_data_shifted: bool,
}
