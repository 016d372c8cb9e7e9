// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities for display and export.

pub mod display;
pub mod file_name;

/// pt-BR renderings of money, dates, and times.
pub use display::{format_currency, format_date, format_time};
/// Dated names for downloaded exports.
pub use file_name::{backup_file_name, dated_file_name};
