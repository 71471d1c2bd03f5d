use crate::core::ledger::Ledger;
use crate::core::obligation::Obligation;
use crate::core::participant::ParticipantId;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// Pairwise obligations between the members of a group.
///
/// Holds exactly one non-negative amount for every ordered pair of
/// distinct participants, stored as a dense matrix indexed by participant
/// position. Participant order is the order in which they were supplied
/// and drives every scan in the reducer and the netter, which keeps
/// results reproducible.
///
/// # Examples
///
/// ```
/// use split_settle::graph::obligation_graph::ObligationGraph;
/// use split_settle::core::obligation::Obligation;
/// use split_settle::core::participant::ParticipantId;
/// use rust_decimal_macros::dec;
///
/// let a = ParticipantId::new("a");
/// let b = ParticipantId::new("b");
/// let mut graph = ObligationGraph::new(vec![a.clone(), b.clone()]);
/// graph.add_obligation(&Obligation::new(a.clone(), b.clone(), dec!(10)));
/// graph.add_obligation(&Obligation::new(a.clone(), b.clone(), dec!(5)));
///
/// assert_eq!(graph.amount(&a, &b), dec!(15));
/// assert_eq!(graph.amount(&b, &a), dec!(0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ObligationGraph {
    participants: Vec<ParticipantId>,
    index: HashMap<ParticipantId, usize>,
    /// Row-major `n x n` matrix: `weights[debtor * n + creditor]`.
    weights: Vec<Decimal>,
}

impl ObligationGraph {
    /// Zero-filled graph over `participants`. Repeated identifiers keep
    /// their first position.
    pub fn new(participants: Vec<ParticipantId>) -> Self {
        let mut unique = Vec::with_capacity(participants.len());
        let mut index = HashMap::with_capacity(participants.len());
        for participant in participants {
            if index.contains_key(&participant) {
                log::warn!("duplicate participant {} ignored", participant);
                continue;
            }
            index.insert(participant.clone(), unique.len());
            unique.push(participant);
        }
        let n = unique.len();
        Self {
            participants: unique,
            index,
            weights: vec![Decimal::ZERO; n * n],
        }
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Participants in scan order.
    pub fn participants(&self) -> &[ParticipantId] {
        &self.participants
    }

    pub fn index_of(&self, participant: &ParticipantId) -> Option<usize> {
        self.index.get(participant).copied()
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.index.contains_key(participant)
    }

    /// Amount `debtor` owes `creditor`; zero when either is unknown.
    pub fn amount(&self, debtor: &ParticipantId, creditor: &ParticipantId) -> Decimal {
        match (self.index_of(debtor), self.index_of(creditor)) {
            (Some(d), Some(c)) => self.weight(d, c),
            _ => Decimal::ZERO,
        }
    }

    /// Add an obligation between two known participants.
    ///
    /// # Panics
    ///
    /// Panics if either side is not part of the graph.
    pub fn add_obligation(&mut self, obligation: &Obligation) {
        let debtor = self
            .index_of(obligation.debtor())
            .unwrap_or_else(|| panic!("unknown debtor {}", obligation.debtor()));
        let creditor = self
            .index_of(obligation.creditor())
            .unwrap_or_else(|| panic!("unknown creditor {}", obligation.creditor()));
        self.add_weight(debtor, creditor, obligation.amount());
    }

    pub(crate) fn weight(&self, debtor: usize, creditor: usize) -> Decimal {
        self.weights[debtor * self.len() + creditor]
    }

    pub(crate) fn set_weight(&mut self, debtor: usize, creditor: usize, amount: Decimal) {
        debug_assert!(debtor != creditor, "self loop at {}", debtor);
        debug_assert!(amount >= Decimal::ZERO, "negative edge {}", amount);
        let n = self.len();
        self.weights[debtor * n + creditor] = amount;
    }

    pub(crate) fn add_weight(&mut self, debtor: usize, creditor: usize, amount: Decimal) {
        let current = self.weight(debtor, creditor);
        self.set_weight(debtor, creditor, current + amount);
    }

    /// Positive edges as obligations, in participant order.
    pub fn obligations(&self) -> Vec<Obligation> {
        let n = self.len();
        let mut out = Vec::new();
        for d in 0..n {
            for c in 0..n {
                let amount = self.weight(d, c);
                if amount > Decimal::ZERO {
                    out.push(Obligation::new(
                        self.participants[d].clone(),
                        self.participants[c].clone(),
                        amount,
                    ));
                }
            }
        }
        out
    }

    /// Number of positive edges.
    pub fn edge_count(&self) -> usize {
        self.weights.iter().filter(|w| **w > Decimal::ZERO).count()
    }

    /// Sum of all edge weights.
    pub fn gross_total(&self) -> Decimal {
        self.weights.iter().sum()
    }

    /// Net balance of every participant: owed to them minus owed by them.
    pub fn balances(&self) -> Ledger {
        let mut ledger = Ledger::new(&self.participants);
        for ob in self.obligations() {
            ledger.apply_obligation(&ob);
        }
        ledger
    }

    /// Whether some participant both owes and is owed. A fully reduced
    /// graph never does.
    pub fn has_chain(&self) -> bool {
        let n = self.len();
        (0..n).any(|p| {
            let owes = (0..n).any(|c| self.weight(p, c) > Decimal::ZERO);
            let owed = (0..n).any(|d| self.weight(d, p) > Decimal::ZERO);
            owes && owed
        })
    }
}

/// Diagnostic form: `{ "debtorId:creditorId": amount }` over positive edges.
impl Serialize for ObligationGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let obligations = self.obligations();
        let mut map = serializer.serialize_map(Some(obligations.len()))?;
        for ob in &obligations {
            map.serialize_entry(
                &format!("{}:{}", ob.debtor(), ob.creditor()),
                &ob.amount().to_f64().unwrap_or_default(),
            )?;
        }
        map.end()
    }
}
