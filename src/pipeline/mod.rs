//! Report & package assembly pipeline.
//!
//! Stages run strictly sequentially inside one uniquely named working
//! directory: render (writes the originals + the report PDF) → pack (writes
//! the tar.gz). Validation happens before orchestration and never touches the
//! filesystem; cleanup happens after the response, on its own schedule.

pub mod cleanup;
pub mod package;
pub mod render;
pub mod schema;
pub mod validate;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

use schema::{schema_for, TransactionCategory, VerificationOutcome};
use validate::UploadedDocumentSet;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF generation error: {0}")]
    Pdf(String),

    #[error("Packaging error: {0}")]
    Package(String),
}

/// Successful pipeline result: the working directory plus both artifacts.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub working_dir: PathBuf,
    pub report_path: PathBuf,
    pub package_path: PathBuf,
}

/// Keeps an order number safe to embed in paths and artifact names.
/// Mirrors the upload-filename rules: path separators stripped, anything
/// exotic replaced, never empty.
pub fn sanitize_component(value: &str) -> String {
    let sanitized: String = value
        .chars()
        .filter(|&c| c != '/' && c != '\\' && c != '\0')
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = sanitized.replace("..", "");
    // Cap by chars, not bytes: alphanumeric keeps multibyte letters.
    let sanitized: String = sanitized.chars().take(64).collect();

    if sanitized.is_empty() {
        "order".into()
    } else {
        sanitized
    }
}

/// Working directory name: order + nanosecond timestamp + random suffix, so
/// two simultaneous invocations for the same order cannot collide.
fn working_dir_for(work_root: &Path, order: &str) -> PathBuf {
    let nanos = chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default();
    let suffix = Uuid::new_v4().simple();
    work_root.join(format!("temp_{order}_{nanos}_{suffix}"))
}

/// Sequences render → pack inside a fresh working directory.
///
/// `documents` must already have passed [`validate::validate`]; orchestration
/// itself performs no validation. Any directory, render, or pack failure
/// surfaces as [`PipelineError`].
pub fn run(
    order: &str,
    category: TransactionCategory,
    outcome: VerificationOutcome,
    documents: &UploadedDocumentSet,
    work_root: &Path,
) -> Result<PipelineRun, PipelineError> {
    let order = sanitize_component(order);
    let working_dir = working_dir_for(work_root, &order);
    fs::create_dir_all(&working_dir)?;

    let schema = schema_for(category);
    let report_path = render::render(&order, category, outcome, documents, schema, &working_dir)?;
    let package_path = package::pack(&order, &working_dir)?;

    tracing::info!(
        order = %order,
        report = %report_path.display(),
        package = %package_path.display(),
        "Pipeline complete"
    );

    Ok(PipelineRun {
        working_dir,
        report_path,
        package_path,
    })
}
