// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Whole-package conversion.
//!
//! - [`facade`] - [`AssetConverter`] and its options and statistics

pub mod facade;

pub use facade::{AssetConverter, ConvertOptions, ConvertOutput, ConvertStats};
