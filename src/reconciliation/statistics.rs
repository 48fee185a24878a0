//! Summary metrics derived from reconciliation state
//!
//! Everything here is recomputed from the state on each call; nothing is
//! cached, so figures can never go stale after a manual match or unmatch.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::reconciliation::store::ReconciliationStore;
use crate::types::*;

/// Reconciliation summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationStatistics {
    /// Bank records in the session (matched + unmatched bank)
    pub total: usize,
    pub matched: usize,
    pub unmatched_bank: usize,
    pub unmatched_book: usize,
    /// Whole percentage of bank records matched, 0 when there are none
    pub match_rate: u32,
    pub exact_matches: usize,
    pub fuzzy_matches: usize,
    pub manual_matches: usize,
    /// Sum of matched bank amounts; unparseable amounts count as zero
    pub matched_value: BigDecimal,
    /// Sum of unmatched bank amounts; unparseable amounts count as zero
    pub unmatched_bank_value: BigDecimal,
    /// Matched pairs whose bank amount did not parse and so added nothing
    pub unparseable_matched_amounts: usize,
}

impl ReconciliationStatistics {
    /// Compute statistics from the three state collections
    pub fn compute(
        matched_pairs: &[Match],
        unmatched_bank: &[IdentifiedRecord],
        unmatched_book: &[IdentifiedRecord],
    ) -> Self {
        let matched = matched_pairs.len();
        let total = matched + unmatched_bank.len();

        let count = |confidence: Confidence| {
            matched_pairs
                .iter()
                .filter(|pair| pair.confidence == confidence)
                .count()
        };

        let matched_value = sum_amounts(matched_pairs.iter().map(|pair| &pair.bank.record));
        let unmatched_bank_value = sum_amounts(unmatched_bank.iter().map(|r| &r.record));
        let unparseable_matched_amounts = matched_pairs
            .iter()
            .filter(|pair| pair.bank.record.normalized_amount.is_none())
            .count();

        Self {
            total,
            matched,
            unmatched_bank: unmatched_bank.len(),
            unmatched_book: unmatched_book.len(),
            match_rate: match_rate(matched, total),
            exact_matches: count(Confidence::Exact),
            fuzzy_matches: count(Confidence::Fuzzy),
            manual_matches: count(Confidence::Manual),
            matched_value,
            unmatched_bank_value,
            unparseable_matched_amounts,
        }
    }
}

impl ReconciliationStore {
    /// Statistics over the store's current state
    pub fn statistics(&self) -> ReconciliationStatistics {
        ReconciliationStatistics::compute(
            self.matched_pairs(),
            self.unmatched_bank(),
            self.unmatched_book(),
        )
    }
}

/// `round(100 * matched / total)`, rounding halves up; 0 for an empty session
pub fn match_rate(matched: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rate = (200 * matched as u64 + total as u64) / (2 * total as u64);
    rate as u32
}

fn sum_amounts<'a>(records: impl Iterator<Item = &'a Record>) -> BigDecimal {
    records
        .filter_map(|record| record.normalized_amount.as_ref())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn identified(id: &str, side: Side, amount: &str) -> IdentifiedRecord {
        IdentifiedRecord::new(
            id.to_string(),
            side,
            0,
            Record::new("2024-01-01".to_string(), amount.to_string(), String::new()),
        )
    }

    fn pair(id: &str, bank_amount: &str, confidence: Confidence) -> Match {
        Match::new(
            id.to_string(),
            identified(&format!("{}-bank", id), Side::Bank, bank_amount),
            identified(&format!("{}-book", id), Side::Book, "0"),
            confidence,
        )
    }

    #[test]
    fn test_empty_state_has_zero_rate() {
        let stats = ReconciliationStatistics::compute(&[], &[], &[]);

        assert_eq!(stats.total, 0);
        assert_eq!(stats.match_rate, 0);
        assert_eq!(stats.matched_value, BigDecimal::from(0));
    }

    #[test]
    fn test_counts_and_values() {
        let pairs = vec![
            pair("m1", "100.50", Confidence::Exact),
            pair("m2", "-20.25", Confidence::Fuzzy),
            pair("m3", "garbage", Confidence::Manual),
        ];
        let unmatched_bank = vec![identified("b1", Side::Bank, "$5.00")];
        let unmatched_book = vec![
            identified("k1", Side::Book, "1.00"),
            identified("k2", Side::Book, "2.00"),
        ];

        let stats = ReconciliationStatistics::compute(&pairs, &unmatched_bank, &unmatched_book);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.matched, 3);
        assert_eq!(stats.unmatched_bank, 1);
        assert_eq!(stats.unmatched_book, 2);
        assert_eq!(stats.match_rate, 75);
        assert_eq!(stats.exact_matches, 1);
        assert_eq!(stats.fuzzy_matches, 1);
        assert_eq!(stats.manual_matches, 1);
        assert_eq!(stats.matched_value, BigDecimal::from_str("80.25").unwrap());
        assert_eq!(stats.unmatched_bank_value, BigDecimal::from(5));
        assert_eq!(stats.unparseable_matched_amounts, 1);
    }

    #[test]
    fn test_match_rate_rounding() {
        assert_eq!(match_rate(1, 3), 33);
        assert_eq!(match_rate(2, 3), 67);
        assert_eq!(match_rate(1, 8), 13); // 12.5 rounds up
        assert_eq!(match_rate(5, 5), 100);
        assert_eq!(match_rate(0, 5), 0);
        assert_eq!(match_rate(0, 0), 0);
    }
}
