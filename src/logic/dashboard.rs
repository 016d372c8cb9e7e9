// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Aggregates shown on the dashboard: headline figures, quote status counts,
//! and the monthly sales series.

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Date, Month, OffsetDateTime, format_description::well_known::Rfc3339};

use crate::models::records::{
    AgendaItem, AgendaStatus, Client, ClientStatus, Quote, QuoteStatus, parse_record_date,
};

/// Months covered by [`monthly_series`] on the dashboard chart.
pub const SERIES_MONTHS: u32 = 6;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_clients: usize,
    pub active_clients: usize,
    /// Sum of approved and finalized quote totals.
    pub total_sales: f64,
    /// Sum of pending and under-review quote totals.
    pub potential_value: f64,
    /// Closed sales as a percentage of all quotes; `0` without quotes.
    pub conversion_rate: f64,
    pub pending_quotes: usize,
    /// Confirmed agenda items.
    pub active_trips: usize,
    pub total_commission: f64,
}

pub fn compute_stats(clients: &[Client], quotes: &[Quote], agenda: &[AgendaItem]) -> DashboardStats {
    let closed: Vec<&Quote> = quotes.iter().filter(|q| q.status.is_closed_sale()).collect();
    let open: Vec<&Quote> = quotes.iter().filter(|q| q.status.is_open()).collect();

    let conversion_rate = if quotes.is_empty() {
        0.0
    } else {
        closed.len() as f64 / quotes.len() as f64 * 100.0
    };

    DashboardStats {
        total_clients: clients.len(),
        active_clients: clients
            .iter()
            .filter(|c| c.status == ClientStatus::Active)
            .count(),
        total_sales: closed.iter().map(|q| q.total).sum(),
        potential_value: open.iter().map(|q| q.total).sum(),
        conversion_rate,
        pending_quotes: open.len(),
        active_trips: agenda
            .iter()
            .filter(|a| a.status == AgendaStatus::Confirmed)
            .count(),
        total_commission: closed.iter().filter_map(|q| q.commission).sum(),
    }
}

/// Quotes per status, in status order.
pub fn status_counts(quotes: &[Quote]) -> BTreeMap<QuoteStatus, usize> {
    let mut counts = BTreeMap::new();
    for quote in quotes {
        *counts.entry(quote.status).or_insert(0) += 1;
    }
    counts
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlySales {
    pub year: i32,
    pub month: u8,
    pub sales: f64,
    pub commission: f64,
    pub quotes: usize,
}

/// Day a quote was created, from either an RFC 3339 timestamp or a plain date.
fn created_on(quote: &Quote) -> Option<Date> {
    OffsetDateTime::parse(quote.created_at.trim(), &Rfc3339)
        .map(|ts| ts.date())
        .ok()
        .or_else(|| parse_record_date(&quote.created_at))
}

/// Step back `n` calendar months from (`year`, `month`).
fn months_back(year: i32, month: Month, n: u32) -> (i32, Month) {
    let index = year * 12 + i32::from(month as u8 - 1) - n as i32;
    let month_number = (index.rem_euclid(12) + 1) as u8;
    let month = Month::try_from(month_number).unwrap_or(Month::January);
    (index.div_euclid(12), month)
}

/// Sales, commission, and quote counts for the `months` months ending at `reference`.
///
/// The series is ordered oldest first and always has `months` entries. Quotes
/// whose creation date does not parse are left out.
pub fn monthly_series(quotes: &[Quote], reference: Date, months: u32) -> Vec<MonthlySales> {
    let dated: Vec<(Date, &Quote)> = quotes
        .iter()
        .filter_map(|q| created_on(q).map(|d| (d, q)))
        .collect();

    (0..months)
        .rev()
        .map(|back| {
            let (year, month) = months_back(reference.year(), reference.month(), back);
            let in_month: Vec<&Quote> = dated
                .iter()
                .filter(|(d, _)| d.year() == year && d.month() == month)
                .map(|(_, q)| *q)
                .collect();
            let closed = in_month.iter().filter(|q| q.status.is_closed_sale());
            MonthlySales {
                year,
                month: month as u8,
                sales: closed.clone().map(|q| q.total).sum(),
                commission: closed.filter_map(|q| q.commission).sum(),
                quotes: in_month.len(),
            }
        })
        .collect()
}
