//! Flat, identifier-free projections of reconciliation state for export

use csv::{QuoteStyle, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::types::*;

/// One matched pair as a flat row: both sides' original fields plus confidence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedExportRow {
    pub bank_date: String,
    pub bank_amount: String,
    #[serde(rename = "bank_desc")]
    pub bank_description: String,
    pub book_date: String,
    pub book_amount: String,
    #[serde(rename = "book_desc")]
    pub book_description: String,
    pub confidence: Confidence,
}

impl From<&Match> for MatchedExportRow {
    fn from(pair: &Match) -> Self {
        Self {
            bank_date: pair.bank.record.date.clone(),
            bank_amount: pair.bank.record.amount.clone(),
            bank_description: pair.bank.record.description.clone(),
            book_date: pair.book.record.date.clone(),
            book_amount: pair.book.record.amount.clone(),
            book_description: pair.book.record.description.clone(),
            confidence: pair.confidence,
        }
    }
}

/// One unmatched record as a flat row of its original fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordExportRow {
    pub date: String,
    pub amount: String,
    pub description: String,
}

impl From<&IdentifiedRecord> for RecordExportRow {
    fn from(identified: &IdentifiedRecord) -> Self {
        Self {
            date: identified.record.date.clone(),
            amount: identified.record.amount.clone(),
            description: identified.record.description.clone(),
        }
    }
}

/// Project matched pairs to export rows
pub fn export_matched(pairs: &[Match]) -> Vec<MatchedExportRow> {
    pairs.iter().map(MatchedExportRow::from).collect()
}

/// Project an unmatched pool to export rows
pub fn export_unmatched(records: &[IdentifiedRecord]) -> Vec<RecordExportRow> {
    records.iter().map(RecordExportRow::from).collect()
}

/// Write rows as delimited text with a header row and every field quoted
///
/// Writes nothing at all for an empty row list.
pub fn write_csv<T: Serialize, W: Write>(rows: &[T], writer: W) -> ReconciliationResult<()> {
    if rows.is_empty() {
        return Ok(());
    }

    let mut csv_writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(writer);

    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|e| ReconciliationError::Export(e.to_string()))?;
    }

    csv_writer
        .flush()
        .map_err(|e| ReconciliationError::Export(e.to_string()))
}
