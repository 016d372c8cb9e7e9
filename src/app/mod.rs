// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Command-line entry point: argument parsing, configuration, and logging setup.

mod commands;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;

use crate::config::Config;
use crate::models::{Collection, FieldKind};
use crate::store::FileStore;

pub use logging::init_logging;

#[derive(Parser, Debug)]
#[command(name = "travelcrm", version)]
#[command(about = "Customer, quote, and agenda tooling for a travel agency")]
#[command(after_help = "\
EXAMPLES:
  travelcrm validate cpf 111.444.777-35
  travelcrm format phone 11987654321
  travelcrm backup export --out backup.json
  travelcrm csv import clientes clientes.csv
  travelcrm agenda upcoming --limit 5")]
pub struct Cli {
    /// Config file (default: TRAVELCRM_CONFIG or the user config file)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a CPF or CNPJ, masked or not
    Validate {
        #[arg(value_enum)]
        kind: IdKind,
        value: String,
    },
    /// Apply an input mask (cpf, cnpj, phone, cep)
    Format { kind: FieldKind, value: String },
    /// Strip everything but digits
    Unformat { value: String },
    /// Full JSON backups of every collection
    #[command(subcommand)]
    Backup(BackupCommand),
    /// CSV export and import of one collection
    #[command(subcommand)]
    Csv(CsvCommand),
    /// Agenda views
    #[command(subcommand)]
    Agenda(AgendaCommand),
    /// Headline figures and the monthly sales series
    Dashboard,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdKind {
    Cpf,
    Cnpj,
}

#[derive(Subcommand, Debug)]
pub enum BackupCommand {
    /// Write every collection to one JSON document
    Export {
        /// Output file (default: backup_crm_<date>.json)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Replace every collection with the contents of a backup
    Import { file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum CsvCommand {
    /// Write one collection as CSV
    Export {
        collection: Collection,
        /// Output file (default: <collection>_<date>.csv)
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Append the rows of a CSV file to one collection
    Import { collection: Collection, file: PathBuf },
}

#[derive(Subcommand, Debug)]
pub enum AgendaCommand {
    /// Events scheduled for today
    Today,
    /// Open events from today on, earliest first
    Upcoming {
        #[arg(short, long, default_value_t = crate::logic::agenda::UPCOMING_LIMIT)]
        limit: usize,
    },
    /// Calendar of one month with its events
    Month {
        year: i32,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=12))]
        month: u8,
    },
}

/// Parse arguments, load configuration, and run the requested command.
pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config.log_level);
    debug!(data_dir = ?config.data_dir, "configuration loaded");

    match cli.command {
        Command::Validate { kind, value } => Ok(commands::validate(kind, &value)),
        Command::Format { kind, value } => {
            println!("{}", crate::models::mask::format(&value, kind));
            Ok(ExitCode::SUCCESS)
        }
        Command::Unformat { value } => {
            println!("{}", crate::models::mask::unformat(&value));
            Ok(ExitCode::SUCCESS)
        }
        Command::Backup(cmd) => {
            let store = FileStore::open(&config.data_dir)?;
            match cmd {
                BackupCommand::Export { out } => commands::backup_export(&store, out)?,
                BackupCommand::Import { file } => commands::backup_import(&store, &file)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Csv(cmd) => {
            let store = FileStore::open(&config.data_dir)?;
            match cmd {
                CsvCommand::Export { collection, out } => {
                    commands::csv_export(&store, collection, out)?
                }
                CsvCommand::Import { collection, file } => {
                    commands::csv_import(&store, collection, &file)?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Agenda(cmd) => {
            let store = FileStore::open(&config.data_dir)?;
            match cmd {
                AgendaCommand::Today => commands::agenda_today(&store)?,
                AgendaCommand::Upcoming { limit } => commands::agenda_upcoming(&store, limit)?,
                AgendaCommand::Month { year, month } => {
                    commands::agenda_month(&store, year, month)?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Dashboard => {
            let store = FileStore::open(&config.data_dir)?;
            commands::dashboard(&store)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_collection_and_field_kind_aliases() {
        let cli = Cli::try_parse_from(["travelcrm", "csv", "export", "cotacoes"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Csv(CsvCommand::Export {
                collection: Collection::Quotes,
                out: None
            })
        ));

        let cli = Cli::try_parse_from(["travelcrm", "format", "cep", "01310100"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Format {
                kind: FieldKind::PostalCode,
                ..
            }
        ));
    }

    #[test]
    fn rejects_out_of_range_month() {
        assert!(Cli::try_parse_from(["travelcrm", "agenda", "month", "2025", "13"]).is_err());
    }
}
