use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A directed debt: `debtor` owes `creditor` a positive `amount`.
///
/// Obligations are derived from expenses on every request and never
/// stored. Parallel obligations between the same ordered pair are summed
/// by the obligation graph.
///
/// # Examples
///
/// ```
/// use split_settle::core::obligation::Obligation;
/// use split_settle::core::participant::ParticipantId;
/// use rust_decimal_macros::dec;
///
/// let ob = Obligation::new(ParticipantId::new("bob"), ParticipantId::new("alice"), dec!(12.50));
/// assert_eq!(ob.amount(), dec!(12.50));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obligation {
    debtor: ParticipantId,
    creditor: ParticipantId,
    amount: Decimal,
}

impl Obligation {
    /// Create a new obligation.
    ///
    /// # Panics
    ///
    /// Panics if `amount` is not positive or if debtor and creditor are the
    /// same participant.
    pub fn new(debtor: ParticipantId, creditor: ParticipantId, amount: Decimal) -> Self {
        assert!(
            amount > Decimal::ZERO,
            "Obligation amount must be positive, got {}",
            amount
        );
        assert!(
            debtor != creditor,
            "Obligation cannot be owed to oneself ({})",
            debtor
        );
        Self {
            debtor,
            creditor,
            amount,
        }
    }

    pub fn debtor(&self) -> &ParticipantId {
        &self.debtor
    }

    pub fn creditor(&self) -> &ParticipantId {
        &self.creditor
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}
