use crate::core::error::{Result, SettlementError};
use crate::core::expense::Split;
use crate::core::money;
use crate::core::participant::ParticipantId;
use crate::split::shares::{dedup, zip_splits};
use rust_decimal::Decimal;

/// Builder for itemized ("meal") splits.
///
/// Each dish is divided evenly among the people who shared it. When the
/// bill is closed, the difference between the bill total and the sum of
/// the dishes (tax, tip, service) is spread in proportion to what each
/// person ate.
///
/// # Examples
///
/// ```
/// use split_settle::core::participant::ParticipantId;
/// use split_settle::split::ItemizedSplit;
/// use rust_decimal_macros::dec;
///
/// let a = ParticipantId::new("a");
/// let b = ParticipantId::new("b");
/// let mut bill = ItemizedSplit::new(vec![a.clone(), b.clone()]);
/// bill.add_item(dec!(30), &[a.clone()]).unwrap();
/// bill.add_item(dec!(10), &[b.clone()]).unwrap();
///
/// // 10% tip on a 40.00 bill
/// let splits = bill.finish(dec!(44)).unwrap();
/// assert_eq!(splits[0].amount, dec!(33));
/// assert_eq!(splits[1].amount, dec!(11));
/// ```
#[derive(Debug, Clone)]
pub struct ItemizedSplit {
    participants: Vec<ParticipantId>,
    /// Unrounded amount accrued per participant, same order.
    accrued: Vec<Decimal>,
    item_count: usize,
}

impl ItemizedSplit {
    pub fn new(participants: Vec<ParticipantId>) -> Self {
        let participants = dedup(&participants);
        let accrued = vec![Decimal::ZERO; participants.len()];
        Self {
            participants,
            accrued,
            item_count: 0,
        }
    }

    /// Add a dish shared evenly by `sharers`.
    pub fn add_item(&mut self, amount: Decimal, sharers: &[ParticipantId]) -> Result<&mut Self> {
        if amount <= Decimal::ZERO {
            return Err(SettlementError::invalid(format!(
                "item amount must be positive, got {}",
                amount
            )));
        }
        let sharers = dedup(sharers);
        if sharers.is_empty() {
            return Err(SettlementError::degenerate("item has nobody sharing it"));
        }

        let mut indices = Vec::with_capacity(sharers.len());
        for sharer in &sharers {
            let idx = self
                .participants
                .iter()
                .position(|p| p == sharer)
                .ok_or_else(|| {
                    SettlementError::invalid(format!("{} is not part of this bill", sharer))
                })?;
            indices.push(idx);
        }

        let per_person = money::round_amount(amount) / Decimal::from(indices.len());
        for idx in indices {
            self.accrued[idx] += per_person;
        }
        self.item_count += 1;
        Ok(self)
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    /// Sum of all dishes entered so far.
    pub fn item_total(&self) -> Decimal {
        money::round_amount(self.accrued.iter().sum())
    }

    /// What is left to distribute for a bill of `total` (negative when the
    /// dishes exceed it).
    pub fn remaining(&self, total: Decimal) -> Decimal {
        money::round_amount(total) - self.item_total()
    }

    /// Unrounded running share of one participant.
    pub fn share_of(&self, participant: &ParticipantId) -> Decimal {
        self.participants
            .iter()
            .position(|p| p == participant)
            .map(|idx| self.accrued[idx])
            .unwrap_or(Decimal::ZERO)
    }

    /// Close the bill at `total` and produce cent-exact splits.
    ///
    /// With no dishes entered the whole total is split evenly. Participants
    /// whose share comes to zero are left out.
    pub fn finish(&self, total: Decimal) -> Result<Vec<Split>> {
        if self.participants.is_empty() {
            return Err(SettlementError::degenerate("bill has no participants"));
        }
        if total <= Decimal::ZERO {
            return Err(SettlementError::invalid(format!(
                "bill total must be positive, got {}",
                total
            )));
        }

        let total = money::round_amount(total);
        let accrued_total: Decimal = self.accrued.iter().sum();
        let raw: Vec<Decimal> = if accrued_total == Decimal::ZERO {
            let per_person = total / Decimal::from(self.participants.len());
            vec![per_person; self.participants.len()]
        } else {
            self.accrued
                .iter()
                .map(|a| *a * total / accrued_total)
                .collect()
        };

        let shares = money::allocate(total, &raw);
        Ok(zip_splits(self.participants.clone(), shares)
            .into_iter()
            .filter(|s| s.amount != Decimal::ZERO)
            .collect())
    }
}
