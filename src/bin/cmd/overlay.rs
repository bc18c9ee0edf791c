// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Overlay command - rewrite a JSON document onto the destination schema.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::common::{
    output_json_or, read_document, resolve_schema_path, write_document, Config, Result,
};
use assetport::transform::OverlayRewriter;
use assetport::SchemaRegistry;

/// Swap the schema overlay and replace the collision field.
#[derive(Args, Clone, Debug)]
pub struct OverlayCmd {
    /// Document exported by the format engine, as JSON
    #[arg(value_name = "DOC")]
    input: PathBuf,

    /// Destination usmap (defaults to `schemas.destination` from the config)
    #[arg(long, value_name = "USMAP")]
    destination: Option<PathBuf>,

    /// Usmap the document was exported with (defaults to `schemas.source`
    /// from the config)
    #[arg(long, value_name = "USMAP")]
    source: Option<PathBuf>,

    /// Output file (defaults to replacing the input)
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// Output the report as JSON
    #[arg(short, long)]
    json: bool,
}

impl OverlayCmd {
    pub fn run(self, config: &Config) -> Result<()> {
        let destination = resolve_schema_path(
            self.destination,
            config.schemas.destination.as_ref(),
            "destination",
        )?;
        let registry = SchemaRegistry::new();
        let schema = registry.load(&destination)?;

        let mut document = read_document(&self.input)?;
        if let Some(source) = self.source.or_else(|| config.schemas.source.clone()) {
            document.set_schema(registry.load(&source)?);
        }
        let report = OverlayRewriter::new(schema).apply(&mut document)?;
        let written = write_document(
            &document,
            &self.input,
            self.output.as_deref(),
            config.output.backup,
        )?;

        let summary = OverlaySummary {
            output: written.display().to_string(),
            source_schema: report.previous_schema,
            destination_schema: report.destination_schema,
            replaced_field: report.replaced_field,
        };
        output_json_or(self.json, &summary, || {
            match &summary.source_schema {
                Some(source) => println!(
                    "Rewrote {} from {} onto {}",
                    summary.output, source, summary.destination_schema
                ),
                None => println!(
                    "Rewrote {} onto {}",
                    summary.output, summary.destination_schema
                ),
            }
            println!("  Replaced field: {}", summary.replaced_field);
            Ok(())
        })
    }
}

#[derive(Serialize)]
struct OverlaySummary {
    output: String,
    source_schema: Option<String>,
    destination_schema: String,
    replaced_field: String,
}
