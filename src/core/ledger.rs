use crate::core::money;
use crate::core::obligation::Obligation;
use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Net balance of each participant, in participant order.
///
/// A positive balance means the participant is owed money (net creditor).
/// A negative balance means the participant owes money (net debtor).
/// Every obligation moves the same amount out of one position and into
/// another, so the positions always sum to exactly zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    positions: Vec<(ParticipantId, Decimal)>,
}

/// Serialized as `{ "participantId": balance }` in participant order.
impl Serialize for Ledger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.positions.len()))?;
        for (participant, amount) in &self.positions {
            map.serialize_entry(participant.as_str(), &amount.to_f64().unwrap_or_default())?;
        }
        map.end()
    }
}

impl Ledger {
    /// A ledger with a zero position for every participant.
    pub fn new(participants: &[ParticipantId]) -> Self {
        Self {
            positions: participants
                .iter()
                .map(|p| (p.clone(), Decimal::ZERO))
                .collect(),
        }
    }

    /// Apply an obligation: debtor loses, creditor gains.
    pub fn apply_obligation(&mut self, obligation: &Obligation) {
        *self.entry_mut(obligation.debtor()) -= obligation.amount();
        *self.entry_mut(obligation.creditor()) += obligation.amount();
    }

    fn entry_mut(&mut self, participant: &ParticipantId) -> &mut Decimal {
        let idx = match self.positions.iter().position(|(p, _)| p == participant) {
            Some(idx) => idx,
            None => {
                self.positions.push((participant.clone(), Decimal::ZERO));
                self.positions.len() - 1
            }
        };
        &mut self.positions[idx].1
    }

    /// Net position of a participant; zero for unknown participants.
    pub fn position(&self, participant: &ParticipantId) -> Decimal {
        self.positions
            .iter()
            .find(|(p, _)| p == participant)
            .map(|(_, amount)| *amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// All positions in participant order.
    pub fn positions(&self) -> &[(ParticipantId, Decimal)] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Verify that the ledger is balanced: sum of all positions = 0.
    pub fn is_balanced(&self) -> bool {
        self.positions.iter().map(|(_, amount)| *amount).sum::<Decimal>() == Decimal::ZERO
    }

    /// Sum of positive positions: the money that has to change hands.
    pub fn total_net_settlement(&self) -> Decimal {
        self.positions
            .iter()
            .map(|(_, amount)| *amount)
            .filter(|amount| *amount > Decimal::ZERO)
            .sum()
    }

    /// How far the money moved by settlements may fall short of
    /// [`total_net_settlement`](Self::total_net_settlement).
    ///
    /// No transfer is ever made for a cent or less, so a debtor/creditor
    /// pair can be left holding up to one cent. The bound is one cent per
    /// such pair, and never less than one cent.
    pub fn settlement_tolerance(&self) -> Decimal {
        let creditors = self.positions.iter().filter(|(_, a)| *a > Decimal::ZERO).count();
        let debtors = self.positions.iter().filter(|(_, a)| *a < Decimal::ZERO).count();
        money::TOLERANCE * Decimal::from((creditors * debtors).max(1))
    }
}
