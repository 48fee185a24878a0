//! Core types and data structures for the reconciliation system

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::normalize::{normalize_amount, normalize_date};

/// Which ledger a record was ingested from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Bank statement (the left ledger)
    Bank,
    /// Internal accounting books (the right ledger)
    Book,
}

impl Side {
    /// The ledger a record on this side gets paired against
    pub fn opposite(&self) -> Side {
        match self {
            Side::Bank => Side::Book,
            Side::Book => Side::Bank,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bank => write!(f, "bank"),
            Side::Book => write!(f, "book"),
        }
    }
}

/// How a match was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Amounts within tolerance and identical dates
    Exact,
    /// Amounts within tolerance and dates inside the day window, but not identical
    Fuzzy,
    /// Linked by an operator regardless of amount or date proximity
    Manual,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Confidence::Exact => write!(f, "exact"),
            Confidence::Fuzzy => write!(f, "fuzzy"),
            Confidence::Manual => write!(f, "manual"),
        }
    }
}

/// A field that could not be normalized
///
/// Parse failures never discard a record. They only make it ineligible for
/// automatic matching, so it surfaces in an unmatched pool for manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseFailure {
    /// The amount cell did not contain a valid signed decimal
    Amount { raw: String },
    /// The date cell was empty or not a recognised calendar date
    Date { raw: String },
}

/// One ledger entry with its raw cell values and their normalized forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Date exactly as it appeared in the source row
    pub date: String,
    /// Amount exactly as it appeared in the source row
    pub amount: String,
    /// Free text description, may be empty
    pub description: String,
    /// Parsed calendar date, `None` when unparseable
    pub normalized_date: Option<NaiveDate>,
    /// Parsed signed amount, `None` when unparseable (NotANumber)
    pub normalized_amount: Option<BigDecimal>,
}

impl Record {
    /// Create a record from raw cell values, normalizing amount and date
    pub fn new(date: String, amount: String, description: String) -> Self {
        let normalized_date = normalize_date(&date);
        let normalized_amount = normalize_amount(&amount);
        Self {
            date,
            amount,
            description,
            normalized_date,
            normalized_amount,
        }
    }

    /// Whether both amount and date normalized successfully
    pub fn is_matchable(&self) -> bool {
        self.normalized_amount.is_some() && self.normalized_date.is_some()
    }

    /// Fields that failed to normalize
    pub fn parse_failures(&self) -> Vec<ParseFailure> {
        let mut failures = Vec::new();
        if self.normalized_amount.is_none() {
            failures.push(ParseFailure::Amount {
                raw: self.amount.clone(),
            });
        }
        if self.normalized_date.is_none() {
            failures.push(ParseFailure::Date {
                raw: self.date.clone(),
            });
        }
        failures
    }
}

/// A record that has been given a session-unique identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifiedRecord {
    /// Identifier, never reused within a session
    pub id: String,
    /// Ledger the record came from
    pub side: Side,
    /// Position of the record in its ingested ledger
    pub source_index: usize,
    /// The record itself
    pub record: Record,
}

impl IdentifiedRecord {
    /// Create a new identified record
    pub fn new(id: String, side: Side, source_index: usize, record: Record) -> Self {
        Self {
            id,
            side,
            source_index,
            record,
        }
    }
}

/// A bank record paired with a book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Match identifier, used to unmatch
    pub id: String,
    pub bank: IdentifiedRecord,
    pub book: IdentifiedRecord,
    pub confidence: Confidence,
}

impl Match {
    /// Create a new match
    pub fn new(
        id: String,
        bank: IdentifiedRecord,
        book: IdentifiedRecord,
        confidence: Confidence,
    ) -> Self {
        Self {
            id,
            bank,
            book,
            confidence,
        }
    }
}

/// Errors that can occur during reconciliation
#[derive(Debug, thiserror::Error)]
pub enum ReconciliationError {
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid field mapping: {0}")]
    InvalidMapping(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Export error: {0}")]
    Export(String),
}

/// Result type for reconciliation operations
pub type ReconciliationResult<T> = Result<T, ReconciliationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_normalizes_fields() {
        let record = Record::new(
            "2024-01-05".to_string(),
            "$1,250.00".to_string(),
            "Client payment".to_string(),
        );

        assert_eq!(
            record.normalized_date,
            NaiveDate::from_ymd_opt(2024, 1, 5)
        );
        assert_eq!(
            record.normalized_amount,
            Some("1250.00".parse::<BigDecimal>().unwrap())
        );
        assert!(record.is_matchable());
        assert!(record.parse_failures().is_empty());
    }

    #[test]
    fn test_record_keeps_unparseable_fields() {
        let record = Record::new(String::new(), "n/a".to_string(), String::new());

        assert!(!record.is_matchable());
        assert_eq!(
            record.parse_failures(),
            vec![
                ParseFailure::Amount {
                    raw: "n/a".to_string()
                },
                ParseFailure::Date { raw: String::new() },
            ]
        );
    }

    #[test]
    fn test_confidence_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Confidence::Fuzzy).unwrap(),
            "\"fuzzy\""
        );
        assert_eq!(Confidence::Manual.to_string(), "manual");
        assert_eq!(Side::Bank.opposite(), Side::Book);
    }
}
