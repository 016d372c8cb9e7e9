// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Full-database backup document: all six collections in one JSON object.
//!
//! Restoring is all-or-nothing. The document shape is checked first (every
//! collection key present and holding an array), then every record is decoded
//! against its schema; only a fully decoded document is handed back.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::logic::error::CodecError;
use crate::models::records::{
    AgendaItem, Client, Collection, Dependent, Product, Quote, Record, Supplier,
};

/// Snapshot of every collection, keyed exactly as stored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BackupDocument {
    #[serde(rename = "clientes")]
    pub clients: Vec<Client>,
    #[serde(rename = "dependentes")]
    pub dependents: Vec<Dependent>,
    #[serde(rename = "fornecedores")]
    pub suppliers: Vec<Supplier>,
    #[serde(rename = "produtos")]
    pub products: Vec<Product>,
    #[serde(rename = "cotacoes")]
    pub quotes: Vec<Quote>,
    pub agenda: Vec<AgendaItem>,
}

impl BackupDocument {
    /// Number of records held for `collection`.
    pub fn count(&self, collection: Collection) -> usize {
        match collection {
            Collection::Clients => self.clients.len(),
            Collection::Dependents => self.dependents.len(),
            Collection::Suppliers => self.suppliers.len(),
            Collection::Products => self.products.len(),
            Collection::Quotes => self.quotes.len(),
            Collection::Agenda => self.agenda.len(),
        }
    }

    /// Total number of records across all collections.
    pub fn total(&self) -> usize {
        Collection::ALL.iter().map(|c| self.count(*c)).sum()
    }
}

/// Encode the document as indented JSON, ready to be written to a `.json` file.
pub fn serialize(doc: &BackupDocument) -> Result<String, CodecError> {
    let text = serde_json::to_string_pretty(doc)?;
    info!(records = doc.total(), "serialized backup document");
    Ok(text)
}

/// Decode a backup document, rejecting it wholesale on any shape or schema problem.
///
/// # Errors
///
/// - [`CodecError::InvalidBackupFormat`] when the text is not a JSON object or a
///   collection key is missing or does not hold an array.
/// - [`CodecError::InvalidRecord`] when a record does not match its schema.
///
/// # Examples
///
/// ```
/// use travelcrm::logic::backup::deserialize;
/// use travelcrm::logic::error::CodecError;
///
/// assert!(matches!(deserialize("{}"), Err(CodecError::InvalidBackupFormat(_))));
/// ```
pub fn deserialize(text: &str) -> Result<BackupDocument, CodecError> {
    let value: Value = serde_json::from_str(text).map_err(|err| {
        warn!(error = %err, "backup is not valid JSON");
        CodecError::InvalidBackupFormat(format!("not valid JSON ({err})"))
    })?;

    let Value::Object(mut object) = value else {
        warn!("backup root is not an object");
        return Err(CodecError::InvalidBackupFormat(
            "expected a JSON object at the root".into(),
        ));
    };

    // Check every key before decoding anything so the error names the shape problem.
    for collection in Collection::ALL {
        match object.get(collection.key()) {
            Some(Value::Array(_)) => {}
            Some(_) => {
                warn!(key = collection.key(), "backup collection is not an array");
                return Err(CodecError::InvalidBackupFormat(format!(
                    "\"{}\" must be an array",
                    collection.key()
                )));
            }
            None => {
                warn!(key = collection.key(), "backup collection missing");
                return Err(CodecError::InvalidBackupFormat(format!(
                    "missing \"{}\"",
                    collection.key()
                )));
            }
        }
    }

    let mut take = |collection: Collection| match object.remove(collection.key()) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };

    let doc = BackupDocument {
        clients: decode_records(take(Collection::Clients))?,
        dependents: decode_records(take(Collection::Dependents))?,
        suppliers: decode_records(take(Collection::Suppliers))?,
        products: decode_records(take(Collection::Products))?,
        quotes: decode_records(take(Collection::Quotes))?,
        agenda: decode_records(take(Collection::Agenda))?,
    };

    if !object.is_empty() {
        let ignored: Vec<&str> = object.keys().map(String::as_str).collect();
        warn!(?ignored, "backup contains unknown keys; they are not restored");
    }
    info!(records = doc.total(), "decoded backup document");
    Ok(doc)
}

/// Decode one collection's array, reporting the index of the first bad record.
pub fn decode_records<T: Record>(items: Vec<Value>) -> Result<Vec<T>, CodecError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|source| CodecError::InvalidRecord {
                collection: T::COLLECTION.key(),
                index,
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::records::fixtures;
    use crate::models::records::{AgendaStatus, QuoteStatus};
    use serde_json::json;

    fn sample() -> BackupDocument {
        BackupDocument {
            clients: vec![fixtures::client("c1", "Ana"), fixtures::client("c2", "Bruno")],
            quotes: vec![fixtures::quote("q1", QuoteStatus::Approved, 2500.0, "2025-01-05")],
            agenda: vec![fixtures::agenda(
                "a1",
                "Check-in Hotel",
                "2025-03-10",
                AgendaStatus::Confirmed,
            )],
            ..Default::default()
        }
    }

    #[test]
    fn round_trip_preserves_every_collection_in_order() {
        let doc = sample();
        let text = serialize(&doc).unwrap();
        assert_eq!(deserialize(&text).unwrap(), doc);
    }

    #[test]
    fn serialized_document_uses_stored_keys_and_indentation() {
        let text = serialize(&BackupDocument::default()).unwrap();
        let keys: Vec<String> = serde_json::from_str::<serde_json::Map<String, Value>>(&text)
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(
            keys,
            ["clientes", "dependentes", "fornecedores", "produtos", "cotacoes", "agenda"]
        );
        assert!(text.contains("\n  \"clientes\": []"));
    }

    #[test]
    fn empty_object_is_rejected() {
        assert!(matches!(
            deserialize("{}"),
            Err(CodecError::InvalidBackupFormat(_))
        ));
    }

    #[test]
    fn non_json_and_non_object_roots_are_rejected() {
        assert!(matches!(
            deserialize("not json"),
            Err(CodecError::InvalidBackupFormat(_))
        ));
        assert!(matches!(
            deserialize("[]"),
            Err(CodecError::InvalidBackupFormat(_))
        ));
    }

    #[test]
    fn collection_that_is_not_an_array_rejects_whole_document() {
        let text = json!({
            "clientes": [], "dependentes": [], "fornecedores": [],
            "produtos": [], "cotacoes": {}, "agenda": []
        })
        .to_string();
        let err = deserialize(&text).unwrap_err();
        assert!(err.to_string().contains("cotacoes"), "{err}");
    }

    #[test]
    fn missing_collection_rejects_whole_document() {
        let text = json!({
            "clientes": [], "dependentes": [], "fornecedores": [],
            "produtos": [], "cotacoes": []
        })
        .to_string();
        let err = deserialize(&text).unwrap_err();
        assert!(err.to_string().contains("agenda"), "{err}");
    }

    #[test]
    fn bad_record_reports_collection_and_index() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["clientes"][1]["status"] = json!("Sumido");
        let err = deserialize(&value.to_string()).unwrap_err();
        match err {
            CodecError::InvalidRecord {
                collection, index, ..
            } => {
                assert_eq!(collection, "clientes");
                assert_eq!(index, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_top_level_keys_are_ignored() {
        let mut value = serde_json::to_value(sample()).unwrap();
        value["usuarios"] = json!([{"id": "u1"}]);
        assert_eq!(deserialize(&value.to_string()).unwrap(), sample());
    }

    #[test]
    fn counts_report_per_collection_sizes() {
        let doc = sample();
        assert_eq!(doc.count(Collection::Clients), 2);
        assert_eq!(doc.count(Collection::Suppliers), 0);
        assert_eq!(doc.total(), 4);
    }
}
