// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use assetport::package::backup_path;
use assetport::AssetDocument;

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "assetport.toml";

/// Settings from `assetport.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schemas: SchemaPaths,
    pub output: OutputConfig,
}

/// Default schema files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SchemaPaths {
    /// Schema the input packages were cooked with
    pub source: Option<PathBuf>,
    /// Schema the output packages target
    pub destination: Option<PathBuf>,
}

/// Output policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Keep `.bak` copies of files that get replaced
    pub backup: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { backup: true }
    }
}

impl Config {
    /// Load `path`, or `assetport.toml` if it exists, or the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

/// Pick the explicit argument, else the configured path.
pub fn resolve_schema_path(
    explicit: Option<PathBuf>,
    configured: Option<&PathBuf>,
    what: &str,
) -> Result<PathBuf> {
    explicit
        .or_else(|| configured.cloned())
        .ok_or_else(|| anyhow::anyhow!("No {what} schema given; pass it or set it in {DEFAULT_CONFIG_FILE}"))
}

/// Read a JSON document.
pub fn read_document(path: &Path) -> Result<AssetDocument> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read document {}", path.display()))?;
    AssetDocument::from_json(&bytes)
        .with_context(|| format!("Failed to parse document {}", path.display()))
}

/// Write a JSON document to `output`, or over `input` when no output is given.
pub fn write_document(
    document: &AssetDocument,
    input: &Path,
    output: Option<&Path>,
    backup: bool,
) -> Result<PathBuf> {
    let target = output.unwrap_or(input).to_path_buf();
    if backup && target.exists() {
        let backup = backup_path(&target);
        fs::copy(&target, &backup)
            .with_context(|| format!("Failed to back up {}", target.display()))?;
    }
    fs::write(&target, document.to_json()?)
        .with_context(|| format!("Failed to write document {}", target.display()))?;
    Ok(target)
}

/// Print `value` as JSON, or run the human-readable printer.
pub fn output_json_or<T>(json: bool, value: &T, human_fn: impl FnOnce() -> Result<()>) -> Result<()>
where
    T: Serialize,
{
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        human_fn()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parse_full() {
        let config = Config::parse(
            r#"
            [schemas]
            source = "schemas/Generic.usmap"
            destination = "schemas/Augusta.usmap"

            [output]
            backup = false
            "#,
        )
        .unwrap();
        assert_eq!(
            config.schemas.destination,
            Some(PathBuf::from("schemas/Augusta.usmap"))
        );
        assert!(!config.output.backup);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::parse("").unwrap();
        assert!(config.schemas.source.is_none());
        assert!(config.output.backup);
    }

    #[test]
    fn test_config_rejects_bad_toml() {
        assert!(Config::parse("[schemas\nsource = 1").is_err());
    }

    #[test]
    fn test_resolve_schema_path() {
        let configured = PathBuf::from("Augusta.usmap");
        assert_eq!(
            resolve_schema_path(None, Some(&configured), "destination").unwrap(),
            configured
        );
        assert_eq!(
            resolve_schema_path(Some(PathBuf::from("x.usmap")), Some(&configured), "destination")
                .unwrap(),
            PathBuf::from("x.usmap")
        );
        assert!(resolve_schema_path(None, None, "destination").is_err());
    }
}
