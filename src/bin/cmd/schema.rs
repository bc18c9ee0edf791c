// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema command - inspect usmap files.

use std::path::PathBuf;

use clap::Subcommand;
use serde::Serialize;

use crate::common::{output_json_or, Result};
use assetport::core::{Ancestry, FName};
use assetport::schema::{read_schema_file, SchemaPropertyData};
use assetport::SchemaLookup;

/// Usmap schema operations.
#[derive(Subcommand, Clone, Debug)]
pub enum SchemaCmd {
    /// Show header fields and counts
    Info {
        /// Usmap file
        #[arg(value_name = "USMAP")]
        input: PathBuf,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Look up a property of a struct, following its super chain
    Lookup {
        /// Usmap file
        #[arg(value_name = "USMAP")]
        input: PathBuf,

        /// Struct or class name
        #[arg(value_name = "STRUCT")]
        struct_name: String,

        /// Property name
        #[arg(value_name = "PROPERTY")]
        property: String,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

impl SchemaCmd {
    pub fn run(self) -> Result<()> {
        match self {
            SchemaCmd::Info { input, json } => cmd_info(input, json),
            SchemaCmd::Lookup {
                input,
                struct_name,
                property,
                json,
            } => cmd_lookup(input, struct_name, property, json),
        }
    }
}

fn cmd_info(input: PathBuf, json: bool) -> Result<()> {
    let schema = read_schema_file(&input)?;

    let info = SchemaInfo {
        name: schema.name.clone(),
        version: schema.version.as_u8(),
        compression: schema.compression.as_str().to_string(),
        names: schema.names.len(),
        enums: schema.enums.len(),
        structs: schema.structs.len(),
        properties: schema.structs.values().map(|s| s.properties.len()).sum(),
        file_version_ue4: schema.versioning.as_ref().map(|v| v.file_version_ue4),
        file_version_ue5: schema.versioning.as_ref().map(|v| v.file_version_ue5),
        net_cl: schema.versioning.as_ref().map(|v| v.net_cl),
    };

    output_json_or(json, &info, || {
        println!("=== {} ===", input.display());
        println!("  Version:     {}", info.version);
        println!("  Compression: {}", info.compression);
        println!("  Names:       {}", info.names);
        println!("  Enums:       {}", info.enums);
        println!("  Structs:     {}", info.structs);
        println!("  Properties:  {}", info.properties);
        if let (Some(ue4), Some(ue5)) = (info.file_version_ue4, info.file_version_ue5) {
            println!("  File version: UE4 {ue4}, UE5 {ue5}");
        }
        Ok(())
    })
}

fn cmd_lookup(input: PathBuf, struct_name: String, property: String, json: bool) -> Result<()> {
    let schema = read_schema_file(&input)?;
    if schema.get_struct(&struct_name).is_none() {
        anyhow::bail!("Struct '{struct_name}' not found in {}", input.display());
    }

    let ancestry = Ancestry::from_chain(vec![FName::detached(struct_name.as_str())]);
    let data = schema.property_data(&property, &ancestry).ok_or_else(|| {
        anyhow::anyhow!("Property '{property}' not found on '{struct_name}' or its supers")
    })?;

    let result = LookupResult {
        owner: struct_name,
        property,
        kind: data.kind().as_str().to_string(),
        type_name: describe(data),
    };

    output_json_or(json, &result, || {
        println!("{}.{}: {}", result.owner, result.property, result.type_name);
        Ok(())
    })
}

/// Render property data as nested type names, e.g.
/// `MapProperty<NameProperty, StructProperty<Vector>>`.
fn describe(data: &SchemaPropertyData) -> String {
    match data {
        SchemaPropertyData::Simple(kind) => kind.as_str().to_string(),
        SchemaPropertyData::Enum { inner, enum_name } => {
            format!("EnumProperty<{enum_name}, {}>", describe(inner))
        }
        SchemaPropertyData::Struct { struct_type } => format!("StructProperty<{struct_type}>"),
        SchemaPropertyData::Container { kind, inner } => {
            format!("{}<{}>", kind.as_str(), describe(inner))
        }
        SchemaPropertyData::Map { key, value } => {
            format!("MapProperty<{}, {}>", describe(key), describe(value))
        }
    }
}

// Output types

#[derive(Serialize)]
struct SchemaInfo {
    name: String,
    version: u8,
    compression: String,
    names: usize,
    enums: usize,
    structs: usize,
    properties: usize,
    file_version_ue4: Option<i32>,
    file_version_ue5: Option<i32>,
    net_cl: Option<u32>,
}

#[derive(Serialize)]
struct LookupResult {
    owner: String,
    property: String,
    kind: String,
    type_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetport::schema::PropertyKind;

    #[test]
    fn test_describe_nested() {
        let data = SchemaPropertyData::Map {
            key: Box::new(SchemaPropertyData::Simple(PropertyKind::Name)),
            value: Box::new(SchemaPropertyData::Container {
                kind: PropertyKind::Array,
                inner: Box::new(SchemaPropertyData::Struct {
                    struct_type: "Vector".to_string(),
                }),
            }),
        };
        assert_eq!(
            describe(&data),
            "MapProperty<NameProperty, ArrayProperty<StructProperty<Vector>>>"
        );
    }
}
