// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Errors raised by the backup and tabular codecs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    /// The backup is not JSON, or a required collection is missing or not an array.
    #[error("Invalid backup file: {0}")]
    InvalidBackupFormat(String),

    /// A record inside an otherwise well-shaped document does not match its schema.
    #[error("Invalid record #{index} in {collection}: {source}")]
    InvalidRecord {
        collection: &'static str,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("No records to export")]
    EmptyInput,

    /// Tabular text without a header and at least one data row.
    #[error("CSV must contain a header and at least one data row")]
    MalformedTable,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
