//! Automatic pairing of bank records with book records
//!
//! The engine is a greedy nearest-date match with bank-side priority. Bank
//! records are visited in their original order and each one claims the
//! still-unclaimed book record whose amount is within tolerance and whose
//! date is closest, provided that distance is within the day tolerance. Ties
//! go to the earliest book record. There is no global optimisation: an
//! earlier bank record keeps its claim even if a later one would have been a
//! closer fit, which keeps every pairing explainable to an operator.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::MatchConfig;
use crate::types::*;
use crate::utils::normalize::day_distance;

/// A record together with its position in the ingested ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub index: usize,
    pub record: Record,
}

/// A pairing proposed by the engine, not yet identified
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedMatch {
    pub bank: SourceRecord,
    pub book: SourceRecord,
    pub confidence: Confidence,
    /// Whole days between the two dates
    pub day_distance: u64,
}

/// Partition of both ledgers produced by one engine run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Pairs in the order their bank records were visited
    pub matched_pairs: Vec<ProposedMatch>,
    /// Bank records never matched, in original order
    pub unmatched_bank: Vec<SourceRecord>,
    /// Book records never matched, in original order
    pub unmatched_book: Vec<SourceRecord>,
}

/// Auto-match engine bound to a configuration
#[derive(Debug, Clone, Default)]
pub struct AutoMatchEngine {
    config: MatchConfig,
}

impl AutoMatchEngine {
    /// Create a new engine
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Match two ledgers with this engine's tolerances
    pub fn run(&self, bank: &[Record], book: &[Record]) -> MatchResult {
        match_records(
            bank,
            book,
            &self.config.amount_tolerance,
            self.config.day_tolerance,
        )
    }
}

/// Greedy nearest-date matching, bank side first
///
/// Never fails. Records whose amount or date did not normalize can never
/// satisfy the tolerance checks and always land in an unmatched pool.
pub fn match_records(
    bank: &[Record],
    book: &[Record],
    amount_tolerance: &BigDecimal,
    day_tolerance: u32,
) -> MatchResult {
    let day_tolerance = u64::from(day_tolerance);
    let mut book_claimed = vec![false; book.len()];
    let mut matched_pairs = Vec::new();
    let mut unmatched_bank = Vec::new();

    for (bank_index, bank_record) in bank.iter().enumerate() {
        let Some(bank_amount) = bank_record.normalized_amount.as_ref() else {
            debug!(bank_index, raw = %bank_record.amount, "Bank amount unparseable, skipping");
            unmatched_bank.push(source(bank_index, bank_record));
            continue;
        };

        // (book index, distance) of the closest candidate so far
        let mut best: Option<(usize, u64)> = None;

        for (book_index, book_record) in book.iter().enumerate() {
            if book_claimed[book_index] {
                continue;
            }

            let Some(book_amount) = book_record.normalized_amount.as_ref() else {
                continue;
            };
            if (bank_amount - book_amount).abs() > *amount_tolerance {
                continue;
            }

            let Some(distance) =
                day_distance(bank_record.normalized_date, book_record.normalized_date)
            else {
                continue;
            };
            if distance > day_tolerance {
                continue;
            }

            // Strict comparison keeps the earliest book record on ties
            if best.is_none_or(|(_, best_distance)| distance < best_distance) {
                best = Some((book_index, distance));
            }
        }

        match best {
            Some((book_index, distance)) => {
                book_claimed[book_index] = true;
                let confidence = if distance == 0 {
                    Confidence::Exact
                } else {
                    Confidence::Fuzzy
                };
                debug!(bank_index, book_index, distance, %confidence, "Matched");
                matched_pairs.push(ProposedMatch {
                    bank: source(bank_index, bank_record),
                    book: source(book_index, &book[book_index]),
                    confidence,
                    day_distance: distance,
                });
            }
            None => unmatched_bank.push(source(bank_index, bank_record)),
        }
    }

    let unmatched_book: Vec<SourceRecord> = book
        .iter()
        .enumerate()
        .filter(|(index, _)| !book_claimed[*index])
        .map(|(index, record)| source(index, record))
        .collect();

    info!(
        bank = bank.len(),
        book = book.len(),
        matched = matched_pairs.len(),
        unmatched_bank = unmatched_bank.len(),
        unmatched_book = unmatched_book.len(),
        "Auto-match complete"
    );

    MatchResult {
        matched_pairs,
        unmatched_bank,
        unmatched_book,
    }
}

fn source(index: usize, record: &Record) -> SourceRecord {
    SourceRecord {
        index,
        record: record.clone(),
    }
}
