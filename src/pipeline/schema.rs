//! Required-document schema registry.
//!
//! Pure static data: one ordered schema per transaction category, mapping a
//! stable document key to the label shown in the report and used for the
//! persisted file name.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction of the P2P transaction. Selects which document schema applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionCategory {
    Buy,
    Sell,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown transaction category: {0}")]
pub struct UnknownCategory(pub String);

impl TransactionCategory {
    pub fn parse(value: &str) -> Result<Self, UnknownCategory> {
        match value.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            _ => Err(UnknownCategory(value.into())),
        }
    }

    /// Human label rendered into the report.
    pub fn label(self) -> &'static str {
        match self {
            Self::Buy => "Compra",
            Self::Sell => "Venta",
        }
    }
}

/// Verification result as declared by the operator. Descriptive data only —
/// never checked against document content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationOutcome {
    Approved,
    Rejected,
}

impl VerificationOutcome {
    /// Permissive parse: anything that is not "approved" reads as rejected.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("approved") {
            Self::Approved
        } else {
            Self::Rejected
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Approved => "Aprobado",
            Self::Rejected => "Rechazado",
        }
    }
}

/// Ordered (key, display label) pairs for one category.
pub type DocumentSchema = &'static [(&'static str, &'static str)];

const BUY_SCHEMA: DocumentSchema = &[
    ("user_profile", "Perfil del Usuario"),
    ("bank_evidence", "Datos Bancarios Usuario"),
    ("titularity_proof", "Prueba de Titularidad"),
    ("user_payment_proof", "Comprobante Bancario"),
    ("user_chat", "Chat del Usuario"),
    ("binance_report", "Informe de Binance"),
];

const SELL_SCHEMA: DocumentSchema = &[
    ("bank_evidence", "Comprobante Bancario"),
    ("user_payment_proof", "Comprobante de Pago del Usuario"),
    ("user_chat", "Chat del Usuario"),
    ("titularity_proof", "Prueba de Titularidad"),
    ("user_profile", "Perfil del Usuario"),
    ("binance_report", "Informe de Binance"),
];

/// The required-document schema for a category.
pub fn schema_for(category: TransactionCategory) -> DocumentSchema {
    match category {
        TransactionCategory::Buy => BUY_SCHEMA,
        TransactionCategory::Sell => SELL_SCHEMA,
    }
}
