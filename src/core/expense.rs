use crate::core::error::{Result, SettlementError};
use crate::core::money::{self, TOLERANCE};
use crate::core::participant::ParticipantId;
use crate::split::{self, ItemizedSplit};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How an expense was divided among the people involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitType {
    Even,
    Uneven,
    Percentage,
    #[serde(alias = "meals")]
    Itemized,
}

impl SplitType {
    /// Even and percentage splits must account for the whole amount.
    pub fn requires_exact_total(self) -> bool {
        matches!(self, SplitType::Even | SplitType::Percentage)
    }
}

/// One participant's share of an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Split {
    #[serde(rename = "participantId")]
    pub participant: ParticipantId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl Split {
    pub fn new(participant: ParticipantId, amount: Decimal) -> Self {
        Self {
            participant,
            amount,
        }
    }
}

/// A shared expense: who paid, how much, and who owes what share of it.
///
/// Expenses arrive from the expense-entry workflow and are never mutated
/// by the engine. A split entry for the payer records the payer's own
/// share and never turns into an obligation.
///
/// # Examples
///
/// ```
/// use split_settle::core::expense::Expense;
/// use split_settle::core::participant::ParticipantId;
/// use rust_decimal_macros::dec;
///
/// let people: Vec<ParticipantId> = ["a", "b", "c"].into_iter().map(ParticipantId::from).collect();
/// let dinner = Expense::even(ParticipantId::new("a"), dec!(30), &people).unwrap();
///
/// assert_eq!(dinner.owed_to_payer(), dec!(20));
/// assert!(dinner.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "payerId")]
    payer: ParticipantId,
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    split_type: SplitType,
    splits: Vec<Split>,
}

impl Expense {
    /// Wrap already-computed splits. Use [`Expense::validate`] before
    /// trusting the result.
    pub fn new(
        payer: ParticipantId,
        amount: Decimal,
        split_type: SplitType,
        splits: Vec<Split>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: None,
            payer,
            amount,
            split_type,
            splits,
        }
    }

    /// Split `amount` evenly among `participants`.
    pub fn even(payer: ParticipantId, amount: Decimal, participants: &[ParticipantId]) -> Result<Self> {
        let splits = split::even_split(amount, participants)?;
        Ok(Self::new(payer, money::round_amount(amount), SplitType::Even, splits))
    }

    /// Split `amount` by percentage shares that total 100.
    pub fn percentage(
        payer: ParticipantId,
        amount: Decimal,
        percentages: &[(ParticipantId, Decimal)],
    ) -> Result<Self> {
        let splits = split::percentage_split(amount, percentages)?;
        Ok(Self::new(
            payer,
            money::round_amount(amount),
            SplitType::Percentage,
            splits,
        ))
    }

    /// Record explicit per-person amounts.
    pub fn uneven(
        payer: ParticipantId,
        amount: Decimal,
        amounts: &[(ParticipantId, Decimal)],
    ) -> Result<Self> {
        let splits = split::uneven_split(amount, amounts)?;
        Ok(Self::new(payer, money::round_amount(amount), SplitType::Uneven, splits))
    }

    /// Close an itemized bill at `total` (tax and tip included).
    pub fn itemized(payer: ParticipantId, total: Decimal, items: &ItemizedSplit) -> Result<Self> {
        let splits = items.finish(total)?;
        Ok(Self::new(payer, money::round_amount(total), SplitType::Itemized, splits))
    }

    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    // --- Accessors ---

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn payer(&self) -> &ParticipantId {
        &self.payer
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn split_type(&self) -> SplitType {
        self.split_type
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// Sum of every split, the payer's own share included.
    pub fn split_total(&self) -> Decimal {
        self.splits.iter().map(|s| s.amount).sum()
    }

    /// Sum of the splits owed to the payer by other participants.
    pub fn owed_to_payer(&self) -> Decimal {
        self.splits
            .iter()
            .filter(|s| s.participant != self.payer)
            .map(|s| s.amount)
            .sum()
    }

    /// All identifiers referenced by this expense, payer first.
    pub fn referenced_participants(&self) -> impl Iterator<Item = &ParticipantId> {
        std::iter::once(&self.payer).chain(self.splits.iter().map(|s| &s.participant))
    }

    /// A zero-amount entry for the payer marks the payer's own share as
    /// implicit: whatever the other splits leave over.
    fn payer_share_implicit(&self) -> bool {
        self.splits
            .iter()
            .any(|s| s.participant == self.payer && s.amount == Decimal::ZERO)
    }

    /// Check the expense's internal consistency.
    ///
    /// Membership of the referenced participants is checked by the
    /// extractor, which knows the group.
    pub fn validate(&self) -> Result<()> {
        if self.amount <= Decimal::ZERO {
            return Err(SettlementError::invalid(format!(
                "expense {} has non-positive amount {}",
                self.id, self.amount
            )));
        }
        if self.splits.is_empty() {
            return Err(SettlementError::degenerate(format!(
                "expense {} has no payees",
                self.id
            )));
        }
        if let Some(split) = self.splits.iter().find(|s| s.amount < Decimal::ZERO) {
            return Err(SettlementError::invalid(format!(
                "expense {} has negative split {} for {}",
                self.id, split.amount, split.participant
            )));
        }

        let owed = self.owed_to_payer();
        if owed > self.amount + TOLERANCE {
            return Err(SettlementError::SplitMismatch {
                declared: owed,
                expected: self.amount,
            });
        }

        if self.split_type.requires_exact_total() && !self.payer_share_implicit() {
            let total = self.split_total();
            if !money::approx_eq(total, self.amount) {
                return Err(SettlementError::SplitMismatch {
                    declared: total,
                    expected: self.amount,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|n| ParticipantId::new(*n)).collect()
    }

    fn split(p: &str, amount: Decimal) -> Split {
        Split::new(ParticipantId::new(p), amount)
    }

    #[test]
    fn test_even_expense() {
        let expense = Expense::even(ParticipantId::new("a"), dec!(30), &ids(&["a", "b", "c"])).unwrap();
        assert_eq!(expense.split_type(), SplitType::Even);
        assert_eq!(expense.split_total(), dec!(30));
        assert_eq!(expense.owed_to_payer(), dec!(20));
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_implicit_payer_share() {
        // Payer listed at zero: the 10.00 left over is the payer's own share.
        let expense = Expense::new(
            ParticipantId::new("a"),
            dec!(30),
            SplitType::Even,
            vec![split("a", dec!(0)), split("b", dec!(10)), split("c", dec!(10))],
        );
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_even_split_must_cover_amount() {
        let expense = Expense::new(
            ParticipantId::new("a"),
            dec!(30),
            SplitType::Even,
            vec![split("b", dec!(10)), split("c", dec!(10))],
        );
        assert_eq!(
            expense.validate(),
            Err(SettlementError::SplitMismatch {
                declared: dec!(20),
                expected: dec!(30),
            })
        );
    }

    #[test]
    fn test_uneven_may_leave_payer_share_unstated() {
        let expense = Expense::new(
            ParticipantId::new("a"),
            dec!(30),
            SplitType::Uneven,
            vec![split("b", dec!(5)), split("c", dec!(12.50))],
        );
        assert!(expense.validate().is_ok());
    }

    #[test]
    fn test_splits_cannot_exceed_amount() {
        let expense = Expense::new(
            ParticipantId::new("a"),
            dec!(10),
            SplitType::Uneven,
            vec![split("b", dec!(8)), split("c", dec!(8))],
        );
        assert!(matches!(
            expense.validate(),
            Err(SettlementError::SplitMismatch { .. })
        ));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let expense = Expense::new(
            ParticipantId::new("a"),
            Decimal::ZERO,
            SplitType::Uneven,
            vec![split("b", dec!(1))],
        );
        assert!(matches!(
            expense.validate(),
            Err(SettlementError::InvalidExpenseData { .. })
        ));
    }

    #[test]
    fn test_negative_split_rejected() {
        let expense = Expense::new(
            ParticipantId::new("a"),
            dec!(10),
            SplitType::Uneven,
            vec![split("b", dec!(-1))],
        );
        assert!(matches!(
            expense.validate(),
            Err(SettlementError::InvalidExpenseData { .. })
        ));
    }

    #[test]
    fn test_empty_splits_are_degenerate() {
        let expense = Expense::new(ParticipantId::new("a"), dec!(10), SplitType::Even, vec![]);
        assert!(matches!(
            expense.validate(),
            Err(SettlementError::DegenerateSplit { .. })
        ));
    }

    #[test]
    fn test_expense_json_shape() {
        let json = r#"{
            "payerId": "a",
            "amount": 30.5,
            "splitType": "meals",
            "splits": [{ "participantId": "b", "amount": 12.25 }]
        }"#;
        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.payer().as_str(), "a");
        assert_eq!(expense.amount(), dec!(30.5));
        assert_eq!(expense.split_type(), SplitType::Itemized);
        assert_eq!(expense.splits()[0].amount, dec!(12.25));
    }
}
