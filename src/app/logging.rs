// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Console logging for the command line.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Map a configured level name to a level filter; unknown names mean `info`.
fn parse_log_level(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "off" => LevelFilter::OFF,
        "error" => LevelFilter::ERROR,
        "warn" | "warning" => LevelFilter::WARN,
        "debug" => LevelFilter::DEBUG,
        "trace" => LevelFilter::TRACE,
        _ => LevelFilter::INFO,
    }
}

/// Install a stderr subscriber; `RUST_LOG` overrides `default_level`.
///
/// Logs go to stderr so exported data written to stdout stays clean.
pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::builder()
        .with_default_directive(parse_log_level(default_level).into())
        .from_env_lossy();

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
