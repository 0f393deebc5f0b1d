//! Upload validation — runs before any filesystem mutation.
//!
//! Strict per-key check: every key the schema requires must be present with
//! non-empty content, and nothing outside the schema may sneak in. All
//! offending keys are collected and reported together, not just the first.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::schema::{schema_for, TransactionCategory, UnknownCategory};

/// One submitted evidentiary document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub key: String,
    pub bytes: Vec<u8>,
    pub media_type: String,
    pub original_filename: Option<String>,
}

/// All documents of one pipeline invocation, keyed by document key.
pub type UploadedDocumentSet = HashMap<String, UploadedDocument>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error(transparent)]
    InvalidCategory(#[from] UnknownCategory),

    #[error("Faltan archivos requeridos: {}", .0.join(", "))]
    MissingDocuments(Vec<String>),

    #[error("Documentos no esperados: {}", .0.join(", "))]
    UnexpectedDocuments(Vec<String>),
}

/// Checks `documents` against the schema for `category`.
///
/// Returns the parsed category on success; afterwards the key set of the
/// document set is exactly the schema's required key set and every entry has
/// content.
pub fn validate(
    category: &str,
    documents: &UploadedDocumentSet,
) -> Result<TransactionCategory, ValidationError> {
    let category = TransactionCategory::parse(category)?;
    let schema = schema_for(category);

    // Missing, empty-content, and empty-filename keys, in schema order.
    let missing: Vec<String> = schema
        .iter()
        .filter(|(key, _)| match documents.get(*key) {
            None => true,
            Some(doc) => {
                doc.bytes.is_empty() || doc.original_filename.as_deref() == Some("")
            }
        })
        .map(|(key, _)| (*key).to_string())
        .collect();

    if !missing.is_empty() {
        return Err(ValidationError::MissingDocuments(missing));
    }

    let mut unexpected: Vec<String> = documents
        .keys()
        .filter(|key| !schema.iter().any(|(k, _)| k == &key.as_str()))
        .cloned()
        .collect();

    if !unexpected.is_empty() {
        unexpected.sort();
        return Err(ValidationError::UnexpectedDocuments(unexpected));
    }

    Ok(category)
}
