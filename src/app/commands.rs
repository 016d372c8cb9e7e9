// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Handlers behind each subcommand. They read and write through a
//! [`KeyValueStore`] and print human-readable output to stdout.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Datelike;
use time::{Date, Month, OffsetDateTime};
use tracing::{info, warn};

use super::IdKind;
use crate::logic::agenda::{self, CHECK_IN_LIMIT};
use crate::logic::dashboard::{self, SERIES_MONTHS};
use crate::logic::tabular::{self, Row};
use crate::logic::backup;
use crate::models::identifier::{is_valid_individual, is_valid_organization};
use crate::models::records::{
    AgendaItem, Client, Collection, Dependent, Product, Quote, Record, Supplier,
};
use crate::store::{KeyValueStore, load_all, load_records, restore_all, save_records};
use crate::utils::{
    backup_file_name, dated_file_name, format_currency, format_date, format_time,
};

/// Today's date on the local clock.
pub(crate) fn local_today() -> Result<Date> {
    let today = chrono::Local::now().date_naive();
    let month = Month::try_from(today.month() as u8).context("Invalid local month")?;
    Date::from_calendar_date(today.year(), month, today.day() as u8)
        .context("Invalid local date")
}

pub(crate) fn validate(kind: IdKind, value: &str) -> ExitCode {
    let valid = match kind {
        IdKind::Cpf => is_valid_individual(value),
        IdKind::Cnpj => is_valid_organization(value),
    };
    if valid {
        println!("valid");
        ExitCode::SUCCESS
    } else {
        println!("invalid");
        ExitCode::FAILURE
    }
}

/// Log every record that would be refused by its entry form.
fn warn_invalid<T: Record>(records: &[T]) -> usize {
    let mut invalid = 0;
    for record in records {
        if let Some(reason) = record.validate() {
            invalid += 1;
            warn!(
                collection = T::COLLECTION.key(),
                id = record.id(),
                reason,
                "record fails validation"
            );
        }
    }
    invalid
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    println!("Wrote {}", path.display());
    Ok(())
}

pub(crate) fn backup_export(store: &dyn KeyValueStore, out: Option<PathBuf>) -> Result<()> {
    let doc = load_all(store)?;
    let text = backup::serialize(&doc)?;
    let path = match out {
        Some(path) => path,
        None => PathBuf::from(backup_file_name(local_today()?)),
    };
    write_output(&path, &text)?;
    info!(records = doc.total(), path = ?path, "backup exported");
    Ok(())
}

/// Restore a backup. The document is decoded completely before any collection
/// is replaced, so a bad file leaves the store untouched.
pub(crate) fn backup_import(store: &dyn KeyValueStore, file: &Path) -> Result<()> {
    let text =
        fs::read_to_string(file).with_context(|| format!("Failed to read backup {:?}", file))?;
    let doc = backup::deserialize(&text)
        .with_context(|| format!("Backup {:?} was not imported", file))?;

    let invalid = warn_invalid(&doc.clients)
        + warn_invalid(&doc.dependents)
        + warn_invalid(&doc.suppliers)
        + warn_invalid(&doc.products)
        + warn_invalid(&doc.quotes)
        + warn_invalid(&doc.agenda);

    restore_all(store, &doc)?;
    println!("Imported {} records", doc.total());
    if invalid > 0 {
        println!("{invalid} records fail form validation; see the log for details");
    }
    Ok(())
}

fn collection_rows(store: &dyn KeyValueStore, collection: Collection) -> Result<Vec<Row>> {
    let rows = match collection {
        Collection::Clients => tabular::rows_from_records(&load_records::<Client>(store)?)?,
        Collection::Dependents => tabular::rows_from_records(&load_records::<Dependent>(store)?)?,
        Collection::Suppliers => tabular::rows_from_records(&load_records::<Supplier>(store)?)?,
        Collection::Products => tabular::rows_from_records(&load_records::<Product>(store)?)?,
        Collection::Quotes => tabular::rows_from_records(&load_records::<Quote>(store)?)?,
        Collection::Agenda => tabular::rows_from_records(&load_records::<AgendaItem>(store)?)?,
    };
    Ok(rows)
}

pub(crate) fn csv_export(
    store: &dyn KeyValueStore,
    collection: Collection,
    out: Option<PathBuf>,
) -> Result<()> {
    let rows = collection_rows(store, collection)?;
    if rows.is_empty() {
        println!("Nothing to export: {collection} is empty");
        return Ok(());
    }
    let text = tabular::to_table(&rows)?;
    let path = match out {
        Some(path) => path,
        None => PathBuf::from(dated_file_name(collection.key(), local_today()?, "csv")),
    };
    write_output(&path, &text)?;
    info!(collection = collection.key(), rows = rows.len(), path = ?path, "collection exported");
    Ok(())
}

/// Decode imported rows as `T` and append them to the stored collection.
fn append_rows<T: Record>(
    store: &dyn KeyValueStore,
    rows: Vec<Row>,
    now: OffsetDateTime,
) -> Result<usize> {
    let imported: Vec<T> = tabular::records_from_rows(rows, now)?;
    warn_invalid(&imported);

    let mut records: Vec<T> = load_records(store)?;
    let count = imported.len();
    records.extend(imported);
    save_records(store, &records)?;
    Ok(count)
}

pub(crate) fn csv_import(
    store: &dyn KeyValueStore,
    collection: Collection,
    file: &Path,
) -> Result<()> {
    let text = fs::read_to_string(file).with_context(|| format!("Failed to read {:?}", file))?;
    let rows = tabular::from_table(&text)
        .with_context(|| format!("{:?} was not imported", file))?;
    let now = OffsetDateTime::now_utc();

    let count = match collection {
        Collection::Clients => append_rows::<Client>(store, rows, now)?,
        Collection::Dependents => append_rows::<Dependent>(store, rows, now)?,
        Collection::Suppliers => append_rows::<Supplier>(store, rows, now)?,
        Collection::Products => append_rows::<Product>(store, rows, now)?,
        Collection::Quotes => append_rows::<Quote>(store, rows, now)?,
        Collection::Agenda => append_rows::<AgendaItem>(store, rows, now)?,
    };
    info!(collection = collection.key(), records = count, "rows imported");
    println!("Imported {count} records into {collection}");
    Ok(())
}

fn agenda_line(item: &AgendaItem, today: Date) -> String {
    let mut line = format!(
        "{} {}  {}",
        format_date(&item.date),
        format_time(&item.time),
        item.title
    );
    if !item.client.is_empty() {
        line.push_str(&format!(" ({})", item.client));
    }
    line.push_str(&format!(" [{}]", item.status.label()));
    if let Some(day) = crate::models::records::parse_record_date(&item.date) {
        line.push_str(&format!(" {}", agenda::days_until(day, today).label()));
    }
    line
}

pub(crate) fn agenda_today(store: &dyn KeyValueStore) -> Result<()> {
    let today = local_today()?;
    let items: Vec<AgendaItem> = load_records(store)?;
    let events = agenda::today_events(&items, today);
    if events.is_empty() {
        println!("No events today");
    }
    for item in events {
        println!("{}", agenda_line(item, today));
    }
    Ok(())
}

pub(crate) fn agenda_upcoming(store: &dyn KeyValueStore, limit: usize) -> Result<()> {
    let today = local_today()?;
    let items: Vec<AgendaItem> = load_records(store)?;
    let events = agenda::upcoming(&items, today, limit);
    if events.is_empty() {
        println!("No upcoming events");
    }
    for item in events {
        println!("{}", agenda_line(item, today));
    }

    let check_ins = agenda::upcoming_check_ins(&items, today, CHECK_IN_LIMIT);
    if !check_ins.is_empty() {
        println!();
        println!("Check-ins:");
        for item in check_ins {
            println!("  {}", agenda_line(item, today));
        }
    }
    Ok(())
}

pub(crate) fn agenda_month(store: &dyn KeyValueStore, year: i32, month: u8) -> Result<()> {
    let month = Month::try_from(month).context("Month must be between 1 and 12")?;
    let grid = agenda::month_grid(year, month)?;
    let items: Vec<AgendaItem> = load_records(store)?;
    let buckets = grid.bucket(&items);
    let today = local_today()?;

    println!("{} {}", grid.month, grid.year);
    println!(" Dom Seg Ter Qua Qui Sex Sáb");
    for week in &grid.weeks {
        let cells: Vec<String> = week
            .iter()
            .map(|day| {
                if !grid.in_month(*day) {
                    "    ".to_string()
                } else if buckets.contains_key(day) {
                    format!(" {:>2}*", day.day())
                } else {
                    format!(" {:>2} ", day.day())
                }
            })
            .collect();
        println!("{}", cells.concat().trim_end());
    }

    for (_, events) in buckets.iter().filter(|(day, _)| grid.in_month(**day)) {
        for item in events {
            println!("{}", agenda_line(item, today));
        }
    }
    Ok(())
}

pub(crate) fn dashboard(store: &dyn KeyValueStore) -> Result<()> {
    let clients: Vec<Client> = load_records(store)?;
    let quotes: Vec<Quote> = load_records(store)?;
    let items: Vec<AgendaItem> = load_records(store)?;
    let stats = dashboard::compute_stats(&clients, &quotes, &items);

    println!("Clients:          {} ({} active)", stats.total_clients, stats.active_clients);
    println!("Sales:            {}", format_currency(stats.total_sales));
    println!("Commission:       {}", format_currency(stats.total_commission));
    println!("Pipeline:         {}", format_currency(stats.potential_value));
    println!("Pending quotes:   {}", stats.pending_quotes);
    println!("Conversion rate:  {:.1}%", stats.conversion_rate);
    println!("Confirmed trips:  {}", stats.active_trips);

    let counts = dashboard::status_counts(&quotes);
    if !counts.is_empty() {
        println!();
        for (status, count) in counts {
            println!("{:<18}{count}", status.label());
        }
    }

    println!();
    for month in dashboard::monthly_series(&quotes, local_today()?, SERIES_MONTHS) {
        println!(
            "{:02}/{}  {:>3} quotes  {}  ({} commission)",
            month.month,
            month.year,
            month.quotes,
            format_currency(month.sales),
            format_currency(month.commission)
        );
    }
    Ok(())
}
