//! Reconciliation session orchestrator tying ingestion, matching and state together

use std::collections::HashMap;
use tracing::warn;

use crate::config::MatchConfig;
use crate::reconciliation::engine::{AutoMatchEngine, MatchResult};
use crate::reconciliation::export::{
    export_matched, export_unmatched, MatchedExportRow, RecordExportRow,
};
use crate::reconciliation::statistics::ReconciliationStatistics;
use crate::reconciliation::store::{CandidateSearch, IntegrityReport, ReconciliationStore};
use crate::traits::IdGenerator;
use crate::types::*;
use crate::utils::mapping::{map_rows, FieldMapping};

/// One operator's reconciliation session
///
/// Owns the engine and the store. Every operation runs to completion before
/// returning; a multi-operator embedding should put the whole `Reconciler`
/// behind a single mutex per session.
pub struct Reconciler {
    engine: AutoMatchEngine,
    store: ReconciliationStore,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl Reconciler {
    /// Create a new session issuing UUID identifiers
    pub fn new(config: MatchConfig) -> Self {
        Self {
            engine: AutoMatchEngine::new(config),
            store: ReconciliationStore::new(),
        }
    }

    /// Create a new session with a custom identifier source
    pub fn with_id_generator(config: MatchConfig, id_generator: Box<dyn IdGenerator>) -> Self {
        Self {
            engine: AutoMatchEngine::new(config),
            store: ReconciliationStore::with_id_generator(id_generator),
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &MatchConfig {
        self.engine.config()
    }

    /// Read access to the current state
    pub fn store(&self) -> &ReconciliationStore {
        &self.store
    }

    /// Map both ledgers' rows, auto-match them and load the result
    ///
    /// Both mappings are validated before anything is matched, so an invalid
    /// mapping leaves the previous state in place.
    pub fn run(
        &mut self,
        bank_rows: &[HashMap<String, String>],
        bank_mapping: &FieldMapping,
        book_rows: &[HashMap<String, String>],
        book_mapping: &FieldMapping,
    ) -> ReconciliationResult<ReconciliationStatistics> {
        let bank = map_rows(bank_rows, bank_mapping)?;
        let book = map_rows(book_rows, book_mapping)?;
        self.run_records(&bank, &book)
    }

    /// Auto-match already mapped records and load the result
    pub fn run_records(
        &mut self,
        bank: &[Record],
        book: &[Record],
    ) -> ReconciliationResult<ReconciliationStatistics> {
        report_parse_failures(Side::Bank, bank);
        report_parse_failures(Side::Book, book);

        let result: MatchResult = self.engine.run(bank, book);
        self.store.initialize(result)?;
        Ok(self.store.statistics())
    }

    /// Link two unmatched records by hand
    pub fn manual_match(
        &mut self,
        selected_id: &str,
        candidate_id: &str,
    ) -> ReconciliationResult<Match> {
        self.store.manual_match(selected_id, candidate_id)
    }

    /// Dissolve a match
    pub fn unmatch(&mut self, match_id: &str) -> ReconciliationResult<()> {
        self.store.unmatch(match_id)
    }

    /// Candidates for manually matching the selected record
    pub fn candidates_for(
        &self,
        selected_id: &str,
        query: &str,
    ) -> ReconciliationResult<CandidateSearch<'_>> {
        self.store.candidates_for(selected_id, query)
    }

    /// Current statistics
    pub fn statistics(&self) -> ReconciliationStatistics {
        self.store.statistics()
    }

    pub fn export_matched(&self) -> Vec<MatchedExportRow> {
        export_matched(self.store.matched_pairs())
    }

    pub fn export_unmatched_bank(&self) -> Vec<RecordExportRow> {
        export_unmatched(self.store.unmatched_bank())
    }

    pub fn export_unmatched_book(&self) -> Vec<RecordExportRow> {
        export_unmatched(self.store.unmatched_book())
    }

    /// Check the partition invariants
    pub fn validate_integrity(&self) -> IntegrityReport {
        self.store.validate_integrity()
    }

    /// Discard the session state
    pub fn reset(&mut self) {
        self.store.reset();
    }
}

fn report_parse_failures(side: Side, records: &[Record]) {
    let unparseable = records.iter().filter(|r| !r.is_matchable()).count();
    if unparseable > 0 {
        warn!(
            %side,
            unparseable,
            total = records.len(),
            "Records with unparseable amount or date will need manual review"
        );
    }
}
