// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod overlay;
mod pad;
mod schema;
mod types;

pub use overlay::OverlayCmd;
pub use pad::PadCmd;
pub use schema::SchemaCmd;
pub use types::FixTypesCmd;
