// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Fix-types command - rebuild complete property type names.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::common::{output_json_or, read_document, write_document, Config, Result};
use assetport::transform::TypeNameResolver;
use assetport::SchemaRegistry;

/// Populate missing complete type names in a JSON document.
#[derive(Args, Clone, Debug)]
pub struct FixTypesCmd {
    /// Document exported by the format engine, as JSON
    #[arg(value_name = "DOC")]
    input: PathBuf,

    /// Usmap used for lookups (defaults to `schemas.destination` from the
    /// config; without one only the document itself is consulted)
    #[arg(long, value_name = "USMAP")]
    schema: Option<PathBuf>,

    /// Output file (defaults to replacing the input)
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,

    /// Nesting limit for property trees
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Output the report as JSON
    #[arg(short, long)]
    json: bool,
}

impl FixTypesCmd {
    pub fn run(self, config: &Config) -> Result<()> {
        let mut document = read_document(&self.input)?;
        if let Some(path) = self.schema.or_else(|| config.schemas.destination.clone()) {
            document.set_schema(SchemaRegistry::new().load(&path)?);
        }

        let mut resolver = TypeNameResolver::new();
        if let Some(depth) = self.max_depth {
            resolver = resolver.with_max_depth(depth);
        }
        let report = resolver.populate(&mut document)?;

        let output = if report.populated > 0 {
            Some(write_document(
                &document,
                &self.input,
                self.output.as_deref(),
                config.output.backup,
            )?)
        } else {
            None
        };

        let summary = TypesSummary {
            output: output.map(|p| p.display().to_string()),
            populated: report.populated,
            preserved: report.preserved,
            skipped: report.skipped.map(|r| r.to_string()),
            placeholders: report
                .placeholders
                .iter()
                .map(|p| format!("{} -> {}", p.location, p.substituted))
                .collect(),
        };

        output_json_or(self.json, &summary, || {
            if let Some(reason) = &summary.skipped {
                println!("Skipped: {reason}");
                return Ok(());
            }
            println!(
                "Populated {} type name(s), kept {}",
                summary.populated, summary.preserved
            );
            if let Some(output) = &summary.output {
                println!("  Written to: {output}");
            }
            if !summary.placeholders.is_empty() {
                println!("  Placeholders ({}):", summary.placeholders.len());
                for placeholder in &summary.placeholders {
                    println!("    {placeholder}");
                }
            }
            Ok(())
        })
    }
}

#[derive(Serialize)]
struct TypesSummary {
    output: Option<String>,
    populated: usize,
    preserved: usize,
    skipped: Option<String>,
    placeholders: Vec<String>,
}
