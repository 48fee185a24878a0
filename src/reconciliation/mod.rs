//! Reconciliation of bank statements against accounting books
//!
//! The flow is one-directional at ingestion (normalize, auto-match, load the
//! store) and then interactive: manual matches and unmatches mutate the store,
//! statistics and exports read it.

pub mod engine;
pub mod export;
pub mod session;
pub mod statistics;
pub mod store;

pub use engine::*;
pub use export::*;
pub use session::*;
pub use statistics::*;
pub use store::*;
