// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Codecs and derived views over the stored collections.

pub mod agenda;
pub mod backup;
pub mod dashboard;
pub mod error;
pub mod tabular;

pub use error::CodecError;
