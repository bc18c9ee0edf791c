// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Immutable byte blobs making up a package.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::error::Result;

/// One half of a package: the header (`.uasset`) or the payload (`.uexp`).
///
/// The buffer is shared, so cloning is cheap. Nothing mutates it in place;
/// every stage hands back a new `ByteAsset` built with [`ByteAsset::with_bytes`].
#[derive(Clone, PartialEq, Eq)]
pub struct ByteAsset {
    name: String,
    bytes: Arc<[u8]>,
}

impl ByteAsset {
    /// Create a named asset from owned bytes.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::from(bytes.into()),
        }
    }

    /// Read a file, naming the asset after its file name.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    /// Write the bytes to `path`, replacing any existing file.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, &self.bytes[..])?;
        Ok(())
    }

    /// Asset name, usually the file name it was read from.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A new asset with the same name and different contents.
    pub fn with_bytes(&self, bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(self.name.clone(), bytes)
    }
}

impl fmt::Debug for ByteAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteAsset")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_bytes_keeps_original() {
        let original = ByteAsset::new("SM_Rock.uexp", vec![1u8, 2, 3]);
        let patched = original.with_bytes(vec![9u8]);

        assert_eq!(original.bytes(), &[1, 2, 3]);
        assert_eq!(patched.bytes(), &[9]);
        assert_eq!(patched.name(), "SM_Rock.uexp");
    }

    #[test]
    fn test_clone_shares_buffer() {
        let asset = ByteAsset::new("a", vec![0u8; 16]);
        let copy = asset.clone();
        assert_eq!(asset.bytes().as_ptr(), copy.bytes().as_ptr());
        assert_eq!(copy.len(), 16);
        assert!(!copy.is_empty());
    }

    #[test]
    fn test_debug_omits_contents() {
        let asset = ByteAsset::new("SM_Rock.uasset", vec![0xAB; 4]);
        let debug = format!("{:?}", asset);
        assert!(debug.contains("SM_Rock.uasset"));
        assert!(debug.contains("len: 4"));
    }
}
