// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Agenda views: search, today/upcoming buckets, and the month calendar grid.
//!
//! Items carry their day as `YYYY-MM-DD` text. Every date comparison goes
//! through [`parse_record_date`], and an item whose date does not parse never
//! lands in a date-based bucket.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use time::{Date, Duration, Month};

use crate::models::records::{AgendaItem, AgendaStatus, parse_record_date};

/// Default number of entries in the upcoming list.
pub const UPCOMING_LIMIT: usize = 10;

/// Default number of entries in the upcoming check-ins list.
pub const CHECK_IN_LIMIT: usize = 5;

/// Case-insensitive search over title, client, and location, plus an optional status.
pub fn filter<'a>(
    items: &'a [AgendaItem],
    search: &str,
    status: Option<AgendaStatus>,
) -> Vec<&'a AgendaItem> {
    let needle = search.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            needle.is_empty()
                || item.title.to_lowercase().contains(&needle)
                || item.client.to_lowercase().contains(&needle)
                || item
                    .location
                    .as_deref()
                    .is_some_and(|l| l.to_lowercase().contains(&needle))
        })
        .filter(|item| status.is_none_or(|s| item.status == s))
        .collect()
}

/// Items scheduled on `today`, whatever their status.
pub fn today_events<'a, I>(items: I, today: Date) -> Vec<&'a AgendaItem>
where
    I: IntoIterator<Item = &'a AgendaItem>,
{
    events_on(items, today)
}

/// Items scheduled on `day`.
pub fn events_on<'a, I>(items: I, day: Date) -> Vec<&'a AgendaItem>
where
    I: IntoIterator<Item = &'a AgendaItem>,
{
    items
        .into_iter()
        .filter(|item| parse_record_date(&item.date) == Some(day))
        .collect()
}

fn is_still_open(status: AgendaStatus) -> bool {
    !matches!(status, AgendaStatus::Cancelled | AgendaStatus::Completed)
}

/// Dated items from `today` on, earliest first, limited to `limit`.
fn dated_from<'a, I, F>(items: I, today: Date, limit: usize, keep: F) -> Vec<&'a AgendaItem>
where
    I: IntoIterator<Item = &'a AgendaItem>,
    F: Fn(&AgendaItem) -> bool,
{
    let mut dated: Vec<(Date, &AgendaItem)> = items
        .into_iter()
        .filter(|item| keep(item))
        .filter_map(|item| parse_record_date(&item.date).map(|d| (d, item)))
        .filter(|(date, _)| *date >= today)
        .collect();
    // Stable sort keeps entry order for same-day items.
    dated.sort_by_key(|(date, _)| *date);
    dated.into_iter().take(limit).map(|(_, item)| item).collect()
}

/// Items on or after `today` that are neither cancelled nor completed.
pub fn upcoming<'a, I>(items: I, today: Date, limit: usize) -> Vec<&'a AgendaItem>
where
    I: IntoIterator<Item = &'a AgendaItem>,
{
    dated_from(items, today, limit, |item| is_still_open(item.status))
}

/// Upcoming check-in events that were not cancelled.
pub fn upcoming_check_ins<'a, I>(items: I, today: Date, limit: usize) -> Vec<&'a AgendaItem>
where
    I: IntoIterator<Item = &'a AgendaItem>,
{
    dated_from(items, today, limit, |item| {
        is_check_in(&item.title) && item.status != AgendaStatus::Cancelled
    })
}

fn is_check_in(title: &str) -> bool {
    let lower = title.to_lowercase();
    lower.contains("check-in") || lower.contains("checkin")
}

/// Distance from today to an event day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DaysUntil {
    Today,
    Tomorrow,
    InDays(i64),
    DaysAgo(i64),
}

impl DaysUntil {
    /// Badge text shown next to upcoming events.
    pub fn label(&self) -> String {
        match self {
            Self::Today => "Hoje".to_string(),
            Self::Tomorrow => "Amanhã".to_string(),
            Self::InDays(n) => format!("Em {n} dias"),
            Self::DaysAgo(n) => format!("{n} dias atrás"),
        }
    }
}

pub fn days_until(date: Date, today: Date) -> DaysUntil {
    match (date - today).whole_days() {
        0 => DaysUntil::Today,
        1 => DaysUntil::Tomorrow,
        n if n < 0 => DaysUntil::DaysAgo(-n),
        n => DaysUntil::InDays(n),
    }
}

/// Calendar colour group, derived from title keywords before status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventCategory {
    CheckIn,
    Departure,
    Return,
    Cancelled,
    Other,
}

pub fn classify(item: &AgendaItem) -> EventCategory {
    let title = item.title.to_lowercase();
    if is_check_in(&title) {
        EventCategory::CheckIn
    } else if title.contains("viagem") || title.contains("embarque") {
        EventCategory::Departure
    } else if title.contains("retorno") || title.contains("chegada") {
        EventCategory::Return
    } else if item.status == AgendaStatus::Cancelled {
        EventCategory::Cancelled
    } else {
        EventCategory::Other
    }
}

/// Sunday-first weeks covering every day of one month.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthGrid {
    pub year: i32,
    pub month: Month,
    pub weeks: Vec<[Date; 7]>,
}

impl MonthGrid {
    pub fn first_day(&self) -> Date {
        self.weeks[0][0]
    }

    pub fn last_day(&self) -> Date {
        self.weeks[self.weeks.len() - 1][6]
    }

    /// Whether `day` belongs to the displayed month (leading/trailing days do not).
    pub fn in_month(&self, day: Date) -> bool {
        day.year() == self.year && day.month() == self.month
    }

    /// Group dated items by grid day; days without events are omitted.
    pub fn bucket<'a, I>(&self, items: I) -> BTreeMap<Date, Vec<&'a AgendaItem>>
    where
        I: IntoIterator<Item = &'a AgendaItem>,
    {
        let (first, last) = (self.first_day(), self.last_day());
        let mut buckets: BTreeMap<Date, Vec<&AgendaItem>> = BTreeMap::new();
        for item in items {
            if let Some(day) = parse_record_date(&item.date)
                && day >= first
                && day <= last
            {
                buckets.entry(day).or_default().push(item);
            }
        }
        buckets
    }
}

/// Build the calendar grid for `month` of `year`.
///
/// # Errors
///
/// Returns an error when the month falls outside the supported date range.
pub fn month_grid(year: i32, month: Month) -> Result<MonthGrid> {
    let first = Date::from_calendar_date(year, month, 1)
        .with_context(|| format!("Invalid calendar month {year}-{}", month as u8))?;
    let last = Date::from_calendar_date(year, month, time::util::days_in_year_month(year, month))
        .with_context(|| format!("Invalid calendar month {year}-{}", month as u8))?;

    let lead = i64::from(first.weekday().number_days_from_sunday());
    let trail = 6 - i64::from(last.weekday().number_days_from_sunday());
    let start = first
        .checked_sub(Duration::days(lead))
        .context("Calendar grid starts before the supported date range")?;
    let end = last
        .checked_add(Duration::days(trail))
        .context("Calendar grid ends after the supported date range")?;

    let mut weeks = Vec::with_capacity(6);
    let mut day = start;
    while day <= end {
        let mut week = [day; 7];
        for slot in week.iter_mut() {
            *slot = day;
            day = day
                .next_day()
                .context("Calendar grid ends after the supported date range")?;
        }
        weeks.push(week);
    }

    Ok(MonthGrid { year, month, weeks })
}
