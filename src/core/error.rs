use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while validating expenses or computing splits.
///
/// Any of these aborts the whole settlement request: a single malformed
/// expense would corrupt the balances of everyone else in the group.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    #[error("invalid expense data: {reason}")]
    InvalidExpenseData { reason: String },
    #[error("split mismatch: parts total {declared}, expected {expected}")]
    SplitMismatch { declared: Decimal, expected: Decimal },
    #[error("degenerate split: {reason}")]
    DegenerateSplit { reason: String },
}

impl SettlementError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidExpenseData {
            reason: reason.into(),
        }
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateSplit {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SettlementError>;
