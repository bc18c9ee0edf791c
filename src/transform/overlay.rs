// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Schema overlay rewriting.
//!
//! Moves a parsed package onto the destination schema and replaces the
//! legacy collision profile name in the body setup's default instance with
//! an explicit `CollisionResponses` struct.

use std::sync::Arc;

use tracing::info;

use crate::core::{ArrayValue, ByteAsset, FName, NameTable, PortError, Property, PropertyValue, Result};
use crate::package::{AssetDocument, FormatEngine};
use crate::schema::Schema;

/// Object name of the export holding the collision setup.
pub const BODY_SETUP_EXPORT: &str = "BodySetup";

/// Struct property of the body setup whose field is replaced.
pub const DEFAULT_INSTANCE: &str = "DefaultInstance";

/// Position of the legacy field inside the default instance.
pub const REPLACED_FIELD_INDEX: usize = 1;

/// Response of one collision channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionResponse {
    Block,
    Overlap,
}

impl CollisionResponse {
    /// Enumerator name in `ECollisionResponse`.
    pub fn enumerator(self) -> &'static str {
        match self {
            CollisionResponse::Block => "ECR_Block",
            CollisionResponse::Overlap => "ECR_Overlap",
        }
    }
}

/// Channel responses written in place of the legacy profile name, in order.
pub const COLLISION_RESPONSES: [(&str, CollisionResponse); 5] = [
    ("SteeringAvoidance", CollisionResponse::Block),
    ("Attack", CollisionResponse::Block),
    ("Interaction", CollisionResponse::Block),
    ("BuildingValidity", CollisionResponse::Overlap),
    ("BuildingPlacement", CollisionResponse::Overlap),
];

/// Build the `CollisionResponses` struct, interning its names into `names`.
///
/// Array elements are named by dummy names holding their index.
pub fn collision_responses(names: &mut NameTable) -> Property {
    let elements = COLLISION_RESPONSES
        .iter()
        .enumerate()
        .map(|(index, (channel, response))| {
            let channel_prop = Property::name_value(names.intern("Channel"), names.intern(channel));
            let response_prop = Property::new(
                names.intern("Response"),
                PropertyValue::Enum {
                    enum_type: Some(names.intern("ECollisionResponse")),
                    inner_type: Some(names.intern("ByteProperty")),
                    value: Some(names.intern(response.enumerator())),
                },
            );
            Property::structure(
                FName::dummy(index.to_string()),
                names.intern("ResponseChannel"),
                vec![channel_prop, response_prop],
            )
        })
        .collect();

    let response_array = Property::new(
        names.intern("ResponseArray"),
        PropertyValue::Array(ArrayValue {
            elements,
            ..ArrayValue::default()
        }),
    );

    Property::structure(
        names.intern("CollisionResponses"),
        names.intern("CollisionResponse"),
        vec![response_array],
    )
}

/// What an overlay rewrite changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayReport {
    /// Name of the schema the document was parsed with, if any
    pub previous_schema: Option<String>,
    pub destination_schema: String,
    /// Name of the field the composite replaced
    pub replaced_field: String,
}

/// Output of [`OverlayRewriter::rewrite`].
#[derive(Debug, Clone)]
pub struct OverlayOutput {
    pub header: ByteAsset,
    pub payload: ByteAsset,
    pub report: OverlayReport,
}

/// Swaps a document's schema overlay and substitutes the collision field.
#[derive(Debug, Clone)]
pub struct OverlayRewriter {
    destination: Arc<Schema>,
}

impl OverlayRewriter {
    pub fn new(destination: Arc<Schema>) -> Self {
        Self { destination }
    }

    pub fn destination(&self) -> &Arc<Schema> {
        &self.destination
    }

    /// Rewrite a parsed document in place.
    ///
    /// The document is left untouched when the body setup export, its
    /// default instance, or the replaced field slot is missing.
    pub fn apply(&self, document: &mut AssetDocument) -> Result<OverlayReport> {
        let slot = locate_replaced_field(document)?;

        let previous = document.set_schema(Arc::clone(&self.destination));
        let composite = collision_responses(&mut document.names);
        let replaced = std::mem::replace(slot_mut(document, slot)?, composite);

        let report = OverlayReport {
            previous_schema: previous.map(|s| s.name.clone()),
            destination_schema: self.destination.name.clone(),
            replaced_field: replaced.name.to_string(),
        };

        info!(
            context = "overlay",
            destination = %report.destination_schema,
            replaced = %report.replaced_field,
            "Rewrote schema overlay"
        );
        Ok(report)
    }

    /// Parse under `source`, rewrite, and serialize through `engine`.
    pub fn rewrite<E: FormatEngine>(
        &self,
        engine: &E,
        header: &ByteAsset,
        payload: &ByteAsset,
        source: Arc<Schema>,
    ) -> Result<OverlayOutput> {
        let mut document = engine.read_document(header, payload, source)?;
        let report = self.apply(&mut document)?;
        let (header, payload) = engine.write_document(&document, header, payload)?;
        Ok(OverlayOutput {
            header,
            payload,
            report,
        })
    }
}

/// Export index and default-instance index of the field to replace.
#[derive(Debug, Clone, Copy)]
struct FieldSlot {
    export: usize,
    property: usize,
}

fn locate_replaced_field(document: &AssetDocument) -> Result<FieldSlot> {
    let (export_index, export) = document
        .find_export(BODY_SETUP_EXPORT)
        .ok_or_else(|| PortError::not_found("BodySetup export", "document exports"))?;

    let properties = export.properties.as_deref().unwrap_or_default();
    let (property_index, instance) = properties
        .iter()
        .enumerate()
        .find(|(_, p)| p.name == DEFAULT_INSTANCE && matches!(p.value, PropertyValue::Struct { .. }))
        .ok_or_else(|| PortError::not_found("DefaultInstance struct", "BodySetup export"))?;

    match &instance.value {
        PropertyValue::Struct { fields, .. } if fields.len() > REPLACED_FIELD_INDEX => Ok(FieldSlot {
            export: export_index,
            property: property_index,
        }),
        _ => Err(PortError::not_found(
            format!("field {REPLACED_FIELD_INDEX}"),
            "BodySetup DefaultInstance",
        )),
    }
}

fn slot_mut(document: &mut AssetDocument, slot: FieldSlot) -> Result<&mut Property> {
    let instance = document
        .exports
        .get_mut(slot.export)
        .and_then(|e| e.properties.as_mut())
        .and_then(|props| props.get_mut(slot.property));
    match instance.map(|p| &mut p.value) {
        Some(PropertyValue::Struct { fields, .. }) => fields
            .get_mut(REPLACED_FIELD_INDEX)
            .ok_or_else(|| PortError::not_found("DefaultInstance field", "BodySetup export")),
        _ => Err(PortError::not_found("DefaultInstance struct", "BodySetup export")),
    }
}
