//! # Ledger Reconcile
//!
//! Reconciles a bank statement against internal accounting books by pairing
//! entries that represent the same real-world transaction, then lets an
//! operator resolve the leftovers by hand.
//!
//! ## Features
//!
//! - **Field normalization**: amounts with currency symbols and thousands separators, dates in common bank formats
//! - **Auto-matching**: deterministic greedy nearest-date pairing within amount and day tolerances
//! - **Manual resolution**: link, unlink and re-link records while the matched/unmatched partition stays consistent
//! - **Statistics**: match rate, confidence breakdown and matched value, recomputed on demand
//! - **Export**: identifier-free flat rows and CSV output
//!
//! ## Quick Start
//!
//! ```rust
//! use ledger_reconcile::{MatchConfig, Reconciler, Record};
//!
//! let bank = vec![Record::new("2024-01-05".to_string(), "$100.00".to_string(), "Deposit".to_string())];
//! let book = vec![Record::new("01/05/2024".to_string(), "100".to_string(), "Invoice 7".to_string())];
//!
//! let mut reconciler = Reconciler::new(MatchConfig::default());
//! let stats = reconciler.run_records(&bank, &book).unwrap();
//! assert_eq!(stats.exact_matches, 1);
//! assert_eq!(stats.match_rate, 100);
//! ```

pub mod config;
pub mod reconciliation;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use reconciliation::*;
pub use traits::*;
pub use types::*;
pub use utils::*;
