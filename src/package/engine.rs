// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The format engine seam.
//!
//! Parsing and writing the container itself is not part of this crate. An
//! engine turns header and payload bytes into a [`PackageLayout`] or an
//! [`AssetDocument`] and writes documents back out.

use std::sync::Arc;

use super::document::AssetDocument;
use super::layout::PackageLayout;
use crate::core::{ByteAsset, Result};
use crate::schema::Schema;

/// A container parser/writer.
pub trait FormatEngine {
    /// Read the export table layout.
    fn read_layout(&self, header: &ByteAsset, payload: &ByteAsset) -> Result<PackageLayout>;

    /// Parse a package into a document, interpreting unversioned data with
    /// `schema`. The returned document carries `schema` as its overlay.
    fn read_document(
        &self,
        header: &ByteAsset,
        payload: &ByteAsset,
        schema: Arc<Schema>,
    ) -> Result<AssetDocument>;

    /// Serialize a document. `header` and `payload` are the blobs it was
    /// read from; the results keep their names.
    fn write_document(
        &self,
        document: &AssetDocument,
        header: &ByteAsset,
        payload: &ByteAsset,
    ) -> Result<(ByteAsset, ByteAsset)>;
}

impl<E: FormatEngine + ?Sized> FormatEngine for &E {
    fn read_layout(&self, header: &ByteAsset, payload: &ByteAsset) -> Result<PackageLayout> {
        (**self).read_layout(header, payload)
    }

    fn read_document(
        &self,
        header: &ByteAsset,
        payload: &ByteAsset,
        schema: Arc<Schema>,
    ) -> Result<AssetDocument> {
        (**self).read_document(header, payload, schema)
    }

    fn write_document(
        &self,
        document: &AssetDocument,
        header: &ByteAsset,
        payload: &ByteAsset,
    ) -> Result<(ByteAsset, ByteAsset)> {
        (**self).write_document(document, header, payload)
    }
}
