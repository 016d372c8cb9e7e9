// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! pt-BR display formatting for money, dates, and times.

use time::{OffsetDateTime, format_description::well_known::Rfc3339, macros::format_description};

use crate::models::records::parse_record_date;

/// Format an amount in Brazilian reais, e.g. `R$ 1.234,56`.
///
/// The currency sign is followed by a non-breaking space, matching what browsers
/// produce for the `pt-BR` locale. Non-finite amounts render as `R$ 0,00`.
pub fn format_currency(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let cents = (value.abs() * 100.0).round() as u64;
    let (units, fraction) = (cents / 100, cents % 100);

    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$\u{a0}{grouped},{fraction:02}")
}

/// Render a stored `YYYY-MM-DD` date as `DD/MM/YYYY`.
///
/// Timestamps are cut to their date part; anything unparseable is returned as-is.
pub fn format_date(raw: &str) -> String {
    let date = parse_record_date(raw).or_else(|| {
        OffsetDateTime::parse(raw.trim(), &Rfc3339)
            .ok()
            .map(|ts| ts.date())
    });
    date.and_then(|d| d.format(format_description!("[day]/[month]/[year]")).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// Render a time of day as `HH:MM`.
///
/// `HH:MM` input passes through; RFC 3339 timestamps are reduced to their
/// hour and minute; anything else is returned unchanged.
pub fn format_time(raw: &str) -> String {
    let trimmed = raw.trim();
    let is_hh_mm = trimmed.len() == 5
        && trimmed.as_bytes()[2] == b':'
        && trimmed
            .bytes()
            .enumerate()
            .all(|(i, b)| i == 2 || b.is_ascii_digit());
    if is_hh_mm {
        return trimmed.to_string();
    }
    OffsetDateTime::parse(trimmed, &Rfc3339)
        .ok()
        .and_then(|ts| ts.format(format_description!("[hour]:[minute]")).ok())
        .unwrap_or_else(|| raw.to_string())
}
