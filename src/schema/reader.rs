// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Usmap schema file reader.
//!
//! A usmap file is a small header followed by an optionally compressed body:
//!
//! ```text
//! u16 magic (0x30C4) | u8 version | [versioning] | u8 compression
//! u32 compressed size | u32 decompressed size | body
//! ```
//!
//! The body holds a name table, then enums, then structs. Every other string
//! is a `u32` index into the name table.

use std::io::Cursor;
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::debug;

use super::ast::{
    CompressionMethod, PackageVersioning, PropertyKind, Schema, SchemaEnum, SchemaProperty,
    SchemaPropertyData, SchemaStruct, UsmapVersion,
};
use crate::core::{PortError, Result};

/// Usmap file magic.
pub const USMAP_MAGIC: u16 = 0x30C4;

/// Name index meaning "no name".
pub const NO_NAME: u32 = 0xFFFF_FFFF;

/// Nesting limit for property data (arrays of maps of ...).
const MAX_DATA_DEPTH: usize = 64;

/// Read a usmap file from disk. The schema is labelled with the file name.
pub fn read_schema_file<P: AsRef<Path>>(path: P) -> Result<Schema> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    read_schema(&label, &bytes)
}

/// Parse usmap bytes.
pub fn read_schema(label: &str, bytes: &[u8]) -> Result<Schema> {
    let mut header = ByteReader::new(label, bytes);

    let magic = header.u16()?;
    if magic != USMAP_MAGIC {
        return Err(PortError::parse(
            label,
            format!("bad magic 0x{magic:04X}, expected 0x{USMAP_MAGIC:04X}"),
        ));
    }

    let raw_version = header.u8()?;
    let version = UsmapVersion::from_u8(raw_version)
        .ok_or_else(|| PortError::unsupported(format!("usmap version {raw_version}")))?;

    let versioning = if version >= UsmapVersion::PackageVersioning && header.i32()? != 0 {
        Some(read_versioning(&mut header)?)
    } else {
        None
    };

    let raw_compression = header.u8()?;
    let compression = CompressionMethod::from_u8(raw_compression).ok_or_else(|| {
        PortError::invalid_schema(label, format!("unknown compression method {raw_compression}"))
    })?;
    let compressed_size = header.u32()? as usize;
    let decompressed_size = header.u32()? as usize;

    let compressed = header.bytes(compressed_size)?;
    let body = match compression {
        CompressionMethod::None => {
            if compressed_size != decompressed_size {
                return Err(PortError::invalid_schema(
                    label,
                    format!(
                        "uncompressed body declares {compressed_size} stored bytes but {decompressed_size} decompressed bytes"
                    ),
                ));
            }
            compressed.to_vec()
        }
        CompressionMethod::Zstd => zstd::bulk::decompress(compressed, decompressed_size)
            .map_err(|e| PortError::parse(label, format!("Zstd decompression failed: {e}")))?,
        other => {
            return Err(PortError::unsupported(format!(
                "usmap compression {}",
                other.as_str()
            )))
        }
    };
    if body.len() != decompressed_size {
        return Err(PortError::invalid_schema(
            label,
            format!(
                "body decompressed to {} bytes, header declares {decompressed_size}",
                body.len()
            ),
        ));
    }

    let mut schema = Schema::new(label);
    schema.version = version;
    schema.versioning = versioning;
    schema.compression = compression;

    let mut reader = ByteReader::new(label, &body);
    schema.names = read_names(&mut reader, version)?;

    let enum_count = reader.u32()?;
    for _ in 0..enum_count {
        let def = read_enum(&mut reader, version, &schema.names)?;
        schema.add_enum(def);
    }

    let struct_count = reader.u32()?;
    for _ in 0..struct_count {
        let def = read_struct(&mut reader, &schema.names)?;
        schema.add_struct(def);
    }

    debug!(
        context = "read_schema",
        schema = %label,
        version = raw_version,
        compression = compression.as_str(),
        names = schema.names.len(),
        enums = schema.enums.len(),
        structs = schema.structs.len(),
        "Loaded usmap schema"
    );

    Ok(schema)
}

fn read_versioning(reader: &mut ByteReader<'_>) -> Result<PackageVersioning> {
    let file_version_ue4 = reader.i32()?;
    let file_version_ue5 = reader.i32()?;
    let licensee_version = reader.i32()?;

    let count = reader.i32()?;
    if count < 0 {
        return Err(reader.invalid(format!("negative custom version count {count}")));
    }
    let mut custom_versions = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        let mut guid = [0u8; 16];
        guid.copy_from_slice(reader.bytes(16)?);
        custom_versions.push((guid, reader.i32()?));
    }

    Ok(PackageVersioning {
        file_version_ue4,
        file_version_ue5,
        licensee_version,
        custom_versions,
        net_cl: reader.u32()?,
    })
}

fn read_names(reader: &mut ByteReader<'_>, version: UsmapVersion) -> Result<Vec<String>> {
    let count = reader.u32()?;
    let mut names = Vec::with_capacity(count.min(1 << 16) as usize);
    for _ in 0..count {
        let len = if version >= UsmapVersion::LongFName {
            reader.u16()? as usize
        } else {
            reader.u8()? as usize
        };
        let raw = reader.bytes(len)?;
        let name = std::str::from_utf8(raw)
            .map_err(|e| reader.invalid(format!("name {} is not UTF-8: {e}", names.len())))?;
        names.push(name.to_string());
    }
    Ok(names)
}

fn read_enum(reader: &mut ByteReader<'_>, version: UsmapVersion, names: &[String]) -> Result<SchemaEnum> {
    let name = reader.name(names)?;
    let count = if version >= UsmapVersion::LargeEnums {
        reader.u16()? as usize
    } else {
        reader.u8()? as usize
    };

    let mut entries = Vec::with_capacity(count);
    for i in 0..count {
        let entry = if version >= UsmapVersion::ExplicitEnumValues {
            let value = reader.i64()?;
            (value, reader.name(names)?)
        } else {
            (i as i64, reader.name(names)?)
        };
        entries.push(entry);
    }

    Ok(SchemaEnum { name, entries })
}

fn read_struct(reader: &mut ByteReader<'_>, names: &[String]) -> Result<SchemaStruct> {
    let name = reader.name(names)?;
    let super_type = reader.optional_name(names)?;
    let property_count = reader.u16()?;
    let serializable_count = reader.u16()?;

    let mut properties = Vec::with_capacity(serializable_count as usize);
    for _ in 0..serializable_count {
        let schema_index = reader.u16()?;
        let array_size = reader.u8()?;
        let prop_name = reader.name(names)?;
        let data = read_property_data(reader, names, 0)?;
        properties.push(SchemaProperty {
            name: prop_name,
            schema_index,
            array_size,
            data,
        });
    }

    Ok(SchemaStruct {
        name,
        super_type,
        property_count,
        properties,
    })
}

fn read_property_data(
    reader: &mut ByteReader<'_>,
    names: &[String],
    depth: usize,
) -> Result<SchemaPropertyData> {
    if depth > MAX_DATA_DEPTH {
        return Err(reader.invalid(format!(
            "property data nested deeper than {MAX_DATA_DEPTH} levels"
        )));
    }

    let raw_kind = reader.u8()?;
    let kind = PropertyKind::from_u8(raw_kind)
        .ok_or_else(|| reader.invalid(format!("unknown property kind {raw_kind}")))?;

    let data = match kind {
        PropertyKind::Enum => {
            let inner = read_property_data(reader, names, depth + 1)?;
            SchemaPropertyData::Enum {
                inner: Box::new(inner),
                enum_name: reader.name(names)?,
            }
        }
        PropertyKind::Struct => SchemaPropertyData::Struct {
            struct_type: reader.name(names)?,
        },
        PropertyKind::Array | PropertyKind::Set | PropertyKind::Optional => {
            SchemaPropertyData::Container {
                kind,
                inner: Box::new(read_property_data(reader, names, depth + 1)?),
            }
        }
        PropertyKind::Map => {
            let key = read_property_data(reader, names, depth + 1)?;
            let value = read_property_data(reader, names, depth + 1)?;
            SchemaPropertyData::Map {
                key: Box::new(key),
                value: Box::new(value),
            }
        }
        simple => SchemaPropertyData::Simple(simple),
    };
    Ok(data)
}

/// Little-endian cursor with bounds checks that report the schema label.
struct ByteReader<'a> {
    label: &'a str,
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    fn new(label: &'a str, data: &'a [u8]) -> Self {
        Self {
            label,
            cursor: Cursor::new(data),
        }
    }

    fn remaining(&self) -> usize {
        let len = self.cursor.get_ref().len();
        len.saturating_sub(self.cursor.position() as usize)
    }

    fn need(&self, n: usize) -> Result<()> {
        if self.remaining() < n {
            return Err(PortError::buffer_too_short(
                n,
                self.remaining(),
                self.cursor.position(),
            ));
        }
        Ok(())
    }

    fn invalid(&self, reason: impl Into<String>) -> PortError {
        PortError::invalid_schema(
            self.label,
            format!("{} (at byte {})", reason.into(), self.cursor.position()),
        )
    }

    fn u8(&mut self) -> Result<u8> {
        self.need(1)?;
        Ok(self.cursor.read_u8()?)
    }

    fn u16(&mut self) -> Result<u16> {
        self.need(2)?;
        Ok(self.cursor.read_u16::<LittleEndian>()?)
    }

    fn u32(&mut self) -> Result<u32> {
        self.need(4)?;
        Ok(self.cursor.read_u32::<LittleEndian>()?)
    }

    fn i32(&mut self) -> Result<i32> {
        self.need(4)?;
        Ok(self.cursor.read_i32::<LittleEndian>()?)
    }

    fn i64(&mut self) -> Result<i64> {
        self.need(8)?;
        Ok(self.cursor.read_i64::<LittleEndian>()?)
    }

    fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.need(n)?;
        let start = self.cursor.position() as usize;
        let data: &'a [u8] = *self.cursor.get_ref();
        self.cursor.set_position((start + n) as u64);
        Ok(&data[start..start + n])
    }

    fn name(&mut self, names: &[String]) -> Result<String> {
        self.optional_name(names)?
            .ok_or_else(|| self.invalid("required name is missing"))
    }

    fn optional_name(&mut self, names: &[String]) -> Result<Option<String>> {
        let index = self.u32()?;
        if index == NO_NAME {
            return Ok(None);
        }
        names
            .get(index as usize)
            .cloned()
            .map(Some)
            .ok_or_else(|| {
                self.invalid(format!(
                    "name index {index} out of range ({} names)",
                    names.len()
                ))
            })
    }
}
