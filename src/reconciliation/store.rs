//! Authoritative post-match state and the operations that mutate it

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

use crate::reconciliation::engine::{MatchResult, SourceRecord};
use crate::traits::IdGenerator;
use crate::types::*;
use crate::utils::id_generator::UuidIdGenerator;

/// Where an identifier currently lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    UnmatchedBank(usize),
    UnmatchedBook(usize),
    Matched(usize),
}

/// Reconciliation state: matched pairs plus the two unmatched pools
///
/// Every operation validates before it mutates, so a failed call leaves all
/// three collections exactly as they were.
pub struct ReconciliationStore {
    matched_pairs: Vec<Match>,
    unmatched_bank: Vec<IdentifiedRecord>,
    unmatched_book: Vec<IdentifiedRecord>,
    bank_total: usize,
    book_total: usize,
    issued_ids: HashSet<String>,
    id_generator: Box<dyn IdGenerator>,
}

impl Default for ReconciliationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconciliationStore {
    /// Create an empty store issuing UUID identifiers
    pub fn new() -> Self {
        Self::with_id_generator(Box::new(UuidIdGenerator::new()))
    }

    /// Create an empty store with a custom identifier source
    pub fn with_id_generator(id_generator: Box<dyn IdGenerator>) -> Self {
        Self {
            matched_pairs: Vec::new(),
            unmatched_bank: Vec::new(),
            unmatched_book: Vec::new(),
            bank_total: 0,
            book_total: 0,
            issued_ids: HashSet::new(),
            id_generator,
        }
    }

    /// Replace the state with an engine result, identifying every record
    ///
    /// Identifiers are drawn pair by pair (bank, book, match), then for the
    /// unmatched bank pool, then for the unmatched book pool.
    pub fn initialize(&mut self, result: MatchResult) -> ReconciliationResult<()> {
        let needed = result.matched_pairs.len() * 3
            + result.unmatched_bank.len()
            + result.unmatched_book.len();
        let mut ids = self.issue_ids(needed)?.into_iter();
        let mut next = move || ids.next().unwrap_or_default();

        let matched_pairs: Vec<Match> = result
            .matched_pairs
            .into_iter()
            .map(|proposed| {
                let bank = identify(next(), Side::Bank, proposed.bank);
                let book = identify(next(), Side::Book, proposed.book);
                Match::new(next(), bank, book, proposed.confidence)
            })
            .collect();
        let unmatched_bank: Vec<IdentifiedRecord> = result
            .unmatched_bank
            .into_iter()
            .map(|source| identify(next(), Side::Bank, source))
            .collect();
        let unmatched_book: Vec<IdentifiedRecord> = result
            .unmatched_book
            .into_iter()
            .map(|source| identify(next(), Side::Book, source))
            .collect();

        self.bank_total = matched_pairs.len() + unmatched_bank.len();
        self.book_total = matched_pairs.len() + unmatched_book.len();
        self.matched_pairs = matched_pairs;
        self.unmatched_bank = unmatched_bank;
        self.unmatched_book = unmatched_book;

        info!(
            matched = self.matched_pairs.len(),
            unmatched_bank = self.unmatched_bank.len(),
            unmatched_book = self.unmatched_book.len(),
            "Reconciliation state initialized"
        );
        Ok(())
    }

    /// Link one unmatched bank record with one unmatched book record
    ///
    /// Argument order does not matter: sidedness comes from pool membership.
    pub fn manual_match(
        &mut self,
        selected_id: &str,
        candidate_id: &str,
    ) -> ReconciliationResult<Match> {
        let selected = self.require_location(selected_id)?;
        let candidate = self.require_location(candidate_id)?;

        let (bank_position, book_position) = match (selected, candidate) {
            (Location::UnmatchedBank(bank), Location::UnmatchedBook(book))
            | (Location::UnmatchedBook(book), Location::UnmatchedBank(bank)) => (bank, book),
            _ => {
                warn!(selected_id, candidate_id, "Rejected manual match");
                return Err(ReconciliationError::InvalidOperation(format!(
                    "Manual match needs one unmatched bank record and one unmatched book record, got '{}' and '{}'",
                    selected_id, candidate_id
                )));
            }
        };

        let match_id = self
            .issue_ids(1)?
            .pop()
            .ok_or_else(|| ReconciliationError::InvalidOperation("No match id issued".to_string()))?;

        let bank = self.unmatched_bank.remove(bank_position);
        let book = self.unmatched_book.remove(book_position);
        let pair = Match::new(match_id, bank, book, Confidence::Manual);
        self.matched_pairs.push(pair.clone());

        info!(
            match_id = %pair.id,
            bank_id = %pair.bank.id,
            book_id = %pair.book.id,
            "Manual match created"
        );
        Ok(pair)
    }

    /// Dissolve a match, appending both records to their unmatched pools
    pub fn unmatch(&mut self, match_id: &str) -> ReconciliationResult<()> {
        let position = self
            .matched_pairs
            .iter()
            .position(|pair| pair.id == match_id)
            .ok_or_else(|| {
                warn!(match_id, "Unmatch of unknown match");
                ReconciliationError::NotFound(format!("Match '{}'", match_id))
            })?;

        let pair = self.matched_pairs.remove(position);
        info!(
            match_id,
            bank_id = %pair.bank.id,
            book_id = %pair.book.id,
            confidence = %pair.confidence,
            "Match dissolved"
        );
        self.unmatched_bank.push(pair.bank);
        self.unmatched_book.push(pair.book);
        Ok(())
    }

    /// Clear all state for a new session
    ///
    /// Issued identifiers are remembered so they are never handed out again.
    pub fn reset(&mut self) {
        self.matched_pairs.clear();
        self.unmatched_bank.clear();
        self.unmatched_book.clear();
        self.bank_total = 0;
        self.book_total = 0;
    }

    /// Unmatched records on the opposite side that fit a search query
    ///
    /// A record fits when its description contains the query
    /// case-insensitively or its raw amount contains the query verbatim. An
    /// empty query returns the whole opposite pool in pool order.
    pub fn candidates_for(
        &self,
        selected_id: &str,
        query: &str,
    ) -> ReconciliationResult<CandidateSearch<'_>> {
        let (selected, pool) = match self.require_location(selected_id)? {
            Location::UnmatchedBank(position) => {
                (&self.unmatched_bank[position], &self.unmatched_book)
            }
            Location::UnmatchedBook(position) => {
                (&self.unmatched_book[position], &self.unmatched_bank)
            }
            Location::Matched(_) => {
                return Err(ReconciliationError::InvalidOperation(format!(
                    "Record '{}' is already matched",
                    selected_id
                )))
            }
        };

        let needle = query.trim().to_lowercase();
        let candidates = pool
            .iter()
            .filter(|candidate| {
                needle.is_empty()
                    || candidate.record.description.to_lowercase().contains(&needle)
                    || candidate.record.amount.contains(query.trim())
            })
            .collect();

        Ok(CandidateSearch {
            selected,
            candidates,
        })
    }

    /// Matched pairs in creation order
    pub fn matched_pairs(&self) -> &[Match] {
        &self.matched_pairs
    }

    /// Bank records not part of any match
    pub fn unmatched_bank(&self) -> &[IdentifiedRecord] {
        &self.unmatched_bank
    }

    /// Book records not part of any match
    pub fn unmatched_book(&self) -> &[IdentifiedRecord] {
        &self.unmatched_book
    }

    /// Number of bank records ingested this session
    pub fn bank_total(&self) -> usize {
        self.bank_total
    }

    /// Number of book records ingested this session
    pub fn book_total(&self) -> usize {
        self.book_total
    }

    /// Get a match by ID
    pub fn get_match(&self, match_id: &str) -> Option<&Match> {
        self.matched_pairs.iter().find(|pair| pair.id == match_id)
    }

    /// Get a record by ID, wherever it currently lives
    pub fn get_record(&self, record_id: &str) -> Option<&IdentifiedRecord> {
        match self.locate(record_id)? {
            Location::UnmatchedBank(position) => self.unmatched_bank.get(position),
            Location::UnmatchedBook(position) => self.unmatched_book.get(position),
            Location::Matched(index) => {
                let pair = &self.matched_pairs[index];
                Some(if pair.bank.id == record_id {
                    &pair.bank
                } else {
                    &pair.book
                })
            }
        }
    }

    /// Check the partition invariants against the current state
    pub fn validate_integrity(&self) -> IntegrityReport {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        let mut record_ids = Vec::new();
        for pair in &self.matched_pairs {
            if pair.bank.side != Side::Bank || pair.book.side != Side::Book {
                issues.push(format!("Match '{}' has records on the wrong side", pair.id));
            }
            record_ids.push(&pair.bank.id);
            record_ids.push(&pair.book.id);
        }
        for record in &self.unmatched_bank {
            if record.side != Side::Bank {
                issues.push(format!("Record '{}' is in the wrong unmatched pool", record.id));
            }
            record_ids.push(&record.id);
        }
        for record in &self.unmatched_book {
            if record.side != Side::Book {
                issues.push(format!("Record '{}' is in the wrong unmatched pool", record.id));
            }
            record_ids.push(&record.id);
        }

        let match_ids = self.matched_pairs.iter().map(|pair| &pair.id);
        for id in record_ids.into_iter().chain(match_ids) {
            if !seen.insert(id) {
                issues.push(format!("Identifier '{}' appears more than once", id));
            }
            if !self.issued_ids.contains(id) {
                issues.push(format!("Identifier '{}' was never issued", id));
            }
        }

        let bank_count = self.matched_pairs.len() + self.unmatched_bank.len();
        if bank_count != self.bank_total {
            issues.push(format!(
                "Bank records out of balance: matched + unmatched = {}, ingested = {}",
                bank_count, self.bank_total
            ));
        }

        let book_count = self.matched_pairs.len() + self.unmatched_book.len();
        if book_count != self.book_total {
            issues.push(format!(
                "Book records out of balance: matched + unmatched = {}, ingested = {}",
                book_count, self.book_total
            ));
        }

        IntegrityReport {
            is_valid: issues.is_empty(),
            issues,
            matched: self.matched_pairs.len(),
            unmatched_bank: self.unmatched_bank.len(),
            unmatched_book: self.unmatched_book.len(),
            bank_total: self.bank_total,
            book_total: self.book_total,
        }
    }

    fn locate(&self, id: &str) -> Option<Location> {
        if let Some(position) = self.unmatched_bank.iter().position(|r| r.id == id) {
            return Some(Location::UnmatchedBank(position));
        }
        if let Some(position) = self.unmatched_book.iter().position(|r| r.id == id) {
            return Some(Location::UnmatchedBook(position));
        }
        self.matched_pairs
            .iter()
            .position(|pair| pair.bank.id == id || pair.book.id == id)
            .map(Location::Matched)
    }

    fn require_location(&self, id: &str) -> ReconciliationResult<Location> {
        self.locate(id).ok_or_else(|| {
            warn!(id, "Unknown record identifier");
            ReconciliationError::NotFound(format!("Record '{}'", id))
        })
    }

    /// Draw `count` fresh identifiers, committing them only if all are new
    fn issue_ids(&mut self, count: usize) -> ReconciliationResult<Vec<String>> {
        let mut fresh = HashSet::with_capacity(count);
        let mut ids = Vec::with_capacity(count);

        for _ in 0..count {
            let id = self.id_generator.next_id();
            if self.issued_ids.contains(&id) || !fresh.insert(id.clone()) {
                return Err(ReconciliationError::InvalidOperation(format!(
                    "Identifier generator repeated '{}'",
                    id
                )));
            }
            ids.push(id);
        }

        self.issued_ids.extend(fresh);
        Ok(ids)
    }
}

fn identify(id: String, side: Side, source: SourceRecord) -> IdentifiedRecord {
    IdentifiedRecord::new(id, side, source.index, source.record)
}

/// Result of a manual-match candidate search
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSearch<'a> {
    /// The unmatched record the operator selected
    pub selected: &'a IdentifiedRecord,
    /// Fitting records from the opposite unmatched pool
    pub candidates: Vec<&'a IdentifiedRecord>,
}

/// Report on the partition invariants of a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub matched: usize,
    pub unmatched_bank: usize,
    pub unmatched_book: usize,
    pub bank_total: usize,
    pub book_total: usize,
}
