//! # split-settle
//!
//! Settlement engine for shared group expenses.
//!
//! Given the members of a group and the expenses they paid for each other,
//! the engine works out who owes whom and recommends a small set of
//! payments that squares everyone up.
//!
//! ## Architecture
//!
//! - **core**: Foundational types: participants, expenses, obligations, ledger, money rounding
//! - **split**: Builders for even, percentage, uneven and itemized splits
//! - **graph**: Obligation extraction, cycle cancellation, transitive chain collapse
//! - **settlement**: Pairwise and greedy netting, reports, the engine facade
//! - **config**: Engine configuration
//! - **simulation**: Random group generation for load testing

pub mod config;
pub mod core;
pub mod graph;
pub mod settlement;
pub mod simulation;
pub mod split;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::core::error::{Result, SettlementError};
    pub use crate::core::expense::{Expense, Split, SplitType};
    pub use crate::core::ledger::Ledger;
    pub use crate::core::obligation::Obligation;
    pub use crate::core::participant::{Participant, ParticipantId};
    pub use crate::graph::extractor::extract;
    pub use crate::graph::obligation_graph::ObligationGraph;
    pub use crate::graph::reducer::{reduce, GraphReducer};
    pub use crate::settlement::engine::SettlementEngine;
    pub use crate::settlement::netting::{NettingEngine, NettingStrategy, Settlement};
    pub use crate::settlement::report::SettlementReport;
    pub use crate::split::ItemizedSplit;
}
