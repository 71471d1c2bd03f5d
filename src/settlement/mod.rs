//! Turning obligations into payments.

pub mod engine;
pub mod netting;
pub mod report;
