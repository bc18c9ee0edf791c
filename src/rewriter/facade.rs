// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! End-to-end package conversion.
//!
//! # Architecture
//!
//! - [`ConvertOptions`] - Configuration for a conversion
//! - [`ConvertStats`] - Statistics gathered across stages
//! - [`AssetConverter`] - Runs padding, overlay rewriting and type-name
//!   population through a [`FormatEngine`]
//!
//! The stages run in a fixed order. The document is re-read under the
//! destination schema after the overlay rewrite so that type names are
//! built against the schema the package will be loaded with.

use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::core::{ByteAsset, Result};
use crate::package::{backup_path, payload_path, FormatEngine, MAX_PROPERTY_DEPTH};
use crate::schema::Schema;
use crate::transform::{MeshPadder, OverlayRewriter, PadOptions, SkipReason, TypeNameResolver};

/// Options for a conversion.
#[derive(Clone, Debug)]
pub struct ConvertOptions {
    /// Pattern and mesh class used for padding
    pub pad: PadOptions,

    /// Whether to insert section padding at all
    pub pad_sections: bool,

    /// Whether to rebuild complete type names after the overlay rewrite
    pub populate_type_names: bool,

    /// Nesting limit for property trees
    pub max_depth: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            pad: PadOptions::default(),
            pad_sections: true,
            populate_type_names: true,
            max_depth: MAX_PROPERTY_DEPTH,
        }
    }
}

impl ConvertOptions {
    pub fn with_pad_options(mut self, pad: PadOptions) -> Self {
        self.pad = pad;
        self
    }

    pub fn with_padding(mut self, enabled: bool) -> Self {
        self.pad_sections = enabled;
        self
    }

    pub fn with_type_names(mut self, enabled: bool) -> Self {
        self.populate_type_names = enabled;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Statistics from a conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertStats {
    /// Mesh sections that received padding
    pub sections_padded: usize,

    /// Bytes added to the payload
    pub size_increase: i64,

    /// Exports whose serial offset moved
    pub exports_shifted: usize,

    /// Names added to the name table by overlay rewriting and type names
    pub names_added: usize,

    /// Type names built
    pub type_names_populated: usize,

    /// Type names that fell back to `Generic` or `None`
    pub placeholders: usize,

    /// Set when type-name population was skipped
    pub type_names_skipped: Option<SkipReason>,
}

impl ConvertStats {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A converted package.
#[derive(Debug, Clone)]
pub struct ConvertOutput {
    pub header: ByteAsset,
    pub payload: ByteAsset,
    pub stats: ConvertStats,
}

/// Converts packages from a source schema to a destination schema.
///
/// # Example
///
/// ```no_run
/// # use std::sync::Arc;
/// # use assetport::{AssetConverter, FormatEngine, SchemaRegistry};
/// # fn run<E: FormatEngine>(engine: E) -> assetport::Result<()> {
/// let schemas = SchemaRegistry::new();
/// let source = schemas.load("schemas/Generic.usmap")?;
/// let destination = schemas.load("schemas/Augusta.usmap")?;
///
/// let converter = AssetConverter::new(engine, source, destination);
/// let stats = converter.convert_in_place("SM_Rock.uasset", true)?;
/// println!("padded {} sections", stats.sections_padded);
/// # Ok(())
/// # }
/// ```
pub struct AssetConverter<E: FormatEngine> {
    engine: E,
    source: Arc<Schema>,
    destination: Arc<Schema>,
    options: ConvertOptions,
}

impl<E: FormatEngine> AssetConverter<E> {
    pub fn new(engine: E, source: Arc<Schema>, destination: Arc<Schema>) -> Self {
        Self::with_options(engine, source, destination, ConvertOptions::default())
    }

    pub fn with_options(
        engine: E,
        source: Arc<Schema>,
        destination: Arc<Schema>,
        options: ConvertOptions,
    ) -> Self {
        Self {
            engine,
            source,
            destination,
            options,
        }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Convert one package held in memory.
    pub fn convert(&self, header: &ByteAsset, payload: &ByteAsset) -> Result<ConvertOutput> {
        let mut stats = ConvertStats::new();

        // Padding
        let (header, payload) = if self.options.pad_sections {
            let layout = self.engine.read_layout(header, payload)?;
            let padded = MeshPadder::with_options(self.options.pad.clone())
                .pad(header, payload, &layout)?;
            stats.sections_padded = padded.plan.section_offsets.len();
            stats.size_increase = padded.plan.size_increase;
            stats.exports_shifted = padded.plan.exports_shifted;
            (padded.header, padded.payload)
        } else {
            (header.clone(), payload.clone())
        };

        // Overlay rewrite
        let mut document = self
            .engine
            .read_document(&header, &payload, Arc::clone(&self.source))?;
        let names_before = document.names.len();
        OverlayRewriter::new(Arc::clone(&self.destination)).apply(&mut document)?;
        stats.names_added += document.names.len() - names_before;
        let (header, payload) = self.engine.write_document(&document, &header, &payload)?;

        if !self.options.populate_type_names {
            return Ok(self.finish(header, payload, stats));
        }

        // Type names, against the destination schema
        let mut document = self
            .engine
            .read_document(&header, &payload, Arc::clone(&self.destination))?;
        let names_before = document.names.len();
        let report = TypeNameResolver::new()
            .with_max_depth(self.options.max_depth)
            .populate(&mut document)?;
        stats.names_added += document.names.len() - names_before;
        stats.type_names_populated = report.populated;
        stats.placeholders = report.placeholders.len();
        stats.type_names_skipped = report.skipped;

        let (header, payload) = if report.populated > 0 {
            self.engine.write_document(&document, &header, &payload)?
        } else {
            (header, payload)
        };

        Ok(self.finish(header, payload, stats))
    }

    /// Convert the package at `header_path` and its `.uexp` payload,
    /// replacing both files. With `backup` the originals are kept next to
    /// them as `.bak` files.
    pub fn convert_in_place<P: AsRef<Path>>(&self, header_path: P, backup: bool) -> Result<ConvertStats> {
        let header_path = header_path.as_ref();
        let payload_path = payload_path(header_path);
        let header = ByteAsset::read(header_path)?;
        let payload = ByteAsset::read(&payload_path)?;

        let output = self.convert(&header, &payload)?;

        if backup {
            header.write(backup_path(header_path))?;
            payload.write(backup_path(&payload_path))?;
        }
        output.header.write(header_path)?;
        output.payload.write(&payload_path)?;
        Ok(output.stats)
    }

    fn finish(&self, header: ByteAsset, payload: ByteAsset, stats: ConvertStats) -> ConvertOutput {
        info!(
            context = "convert",
            asset = %header.name(),
            source = %self.source.name,
            destination = %self.destination.name,
            sections_padded = stats.sections_padded,
            names_added = stats.names_added,
            type_names = stats.type_names_populated,
            placeholders = stats.placeholders,
            "Converted package"
        );
        ConvertOutput {
            header,
            payload,
            stats,
        }
    }
}
