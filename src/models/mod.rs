// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: record types, identifier validation, and input masks.

pub mod identifier;
pub mod lenient;
pub mod mask;
pub mod records;

pub use identifier::{is_valid_individual, is_valid_organization};
pub use mask::FieldKind;
pub use records::{Collection, Record};
