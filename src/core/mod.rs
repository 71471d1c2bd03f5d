//! Foundational types: participants, expenses, obligations, balances and
//! the currency rounding policy.

pub mod error;
pub mod expense;
pub mod ledger;
pub mod money;
pub mod obligation;
pub mod participant;
