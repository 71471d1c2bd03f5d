use crate::core::money;
use crate::core::participant::ParticipantId;
use crate::graph::obligation_graph::ObligationGraph;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A recommended payment from a debtor to a creditor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    #[serde(rename = "debtorId")]
    pub debtor: ParticipantId,
    #[serde(rename = "creditorId")]
    pub creditor: ParticipantId,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl Settlement {
    pub fn new(debtor: ParticipantId, creditor: ParticipantId, amount: Decimal) -> Self {
        Self {
            debtor,
            creditor,
            amount,
        }
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} pays {} {}",
            self.debtor,
            self.creditor,
            money::format_amount(self.amount)
        )
    }
}

/// How balances are turned into payments.
///
/// Both strategies move the money that is owed, short of at most one cent
/// per debtor/creditor pair (see [`Ledger::settlement_tolerance`]); they
/// can differ in how many transfers they emit and between whom. The
/// default lives in [`EngineConfig`](crate::config::EngineConfig).
///
/// [`Ledger::settlement_tolerance`]: crate::core::ledger::Ledger::settlement_tolerance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NettingStrategy {
    /// Net each pair of participants against each other. Used on a reduced
    /// graph for the "who owes whom" view.
    #[serde(alias = "pairwise")]
    PairwiseDirect,
    /// Match the largest creditor with the largest debtor until everyone
    /// is square. Emits at most `n - 1` transfers.
    #[serde(alias = "aggregate")]
    AggregateGreedy,
}

impl NettingStrategy {
    pub fn as_str(self) -> &'static str {
        match self {
            NettingStrategy::PairwiseDirect => "pairwise",
            NettingStrategy::AggregateGreedy => "aggregate",
        }
    }
}

impl fmt::Display for NettingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown netting strategy '{0}' (expected pairwise or aggregate)")]
pub struct UnknownStrategy(pub String);

impl FromStr for NettingStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pairwise" | "pairwise_direct" | "direct" => Ok(NettingStrategy::PairwiseDirect),
            "aggregate" | "aggregate_greedy" | "greedy" => Ok(NettingStrategy::AggregateGreedy),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

/// Balance netting over an obligation graph.
///
/// Output is always ordered by debtor, then creditor, position in the
/// graph's participant list. Amounts at or below one cent are dropped, so
/// when what is owed is spread thin (say four creditors owed a cent each)
/// that money stays where it is rather than moving in sub-cent transfers.
pub struct NettingEngine;

impl NettingEngine {
    /// Net the obligations between two participants.
    ///
    /// If A owes B 100 and B owes A 60, the result is A pays B 40. Returns
    /// `None` when the pair is square (within a cent) or either side is
    /// unknown.
    pub fn bilateral_net(
        graph: &ObligationGraph,
        a: &ParticipantId,
        b: &ParticipantId,
    ) -> Option<Settlement> {
        let i = graph.index_of(a)?;
        let j = graph.index_of(b)?;
        if i == j {
            return None;
        }
        Self::net_pair(graph, i, j)
    }

    /// Pairwise direct netting: one settlement per unordered pair whose
    /// obligations do not cancel out.
    pub fn pairwise_net(graph: &ObligationGraph) -> Vec<Settlement> {
        let n = graph.len();
        let mut out = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if let Some(settlement) = Self::net_pair(graph, i, j) {
                    out.push(settlement);
                }
            }
        }
        sort_by_position(graph, &mut out);
        out
    }

    /// Aggregate greedy netting over per-participant balances.
    ///
    /// While some creditor is owed more than a cent and some debtor owes
    /// more than a cent, the largest creditor is paid by the most indebted
    /// debtor (earliest participant on ties) the smaller of the two
    /// magnitudes. Every transfer squares at least one side. It stops once
    /// every creditor or every debtor is within a cent of zero; whatever
    /// the other side still holds is then made of those sub-cent amounts.
    pub fn aggregate_net(graph: &ObligationGraph) -> Vec<Settlement> {
        let participants = graph.participants();
        let mut balances: Vec<Decimal> = graph
            .balances()
            .positions()
            .iter()
            .map(|(_, amount)| *amount)
            .collect();

        let mut out = Vec::new();
        loop {
            let creditor = extreme(&balances, |candidate, best| candidate > best);
            let debtor = extreme(&balances, |candidate, best| candidate < best);
            let (c, d) = match (creditor, debtor) {
                (Some(c), Some(d)) => (c, d),
                _ => break,
            };
            let owed = balances[c];
            let owing = -balances[d];
            if money::is_noise(owed) || money::is_noise(owing) {
                if owed > Decimal::ZERO && owing > Decimal::ZERO {
                    log::debug!(
                        "greedy netting left {} owed to {} and {} owed by {} in sub-cent balances",
                        owed,
                        participants[c],
                        owing,
                        participants[d]
                    );
                }
                break;
            }

            let amount = owed.min(owing);
            balances[c] -= amount;
            balances[d] += amount;
            log::trace!(
                "greedy transfer {} -> {}: {}",
                participants[d],
                participants[c],
                amount
            );
            out.push(Settlement::new(
                participants[d].clone(),
                participants[c].clone(),
                amount,
            ));
        }
        sort_by_position(graph, &mut out);
        out
    }

    /// Run the chosen strategy.
    pub fn settle(graph: &ObligationGraph, strategy: NettingStrategy) -> Vec<Settlement> {
        match strategy {
            NettingStrategy::PairwiseDirect => Self::pairwise_net(graph),
            NettingStrategy::AggregateGreedy => Self::aggregate_net(graph),
        }
    }

    fn net_pair(graph: &ObligationGraph, i: usize, j: usize) -> Option<Settlement> {
        let net = graph.weight(i, j) - graph.weight(j, i);
        if money::is_noise(net.abs()) {
            return None;
        }
        let participants = graph.participants();
        let (debtor, creditor) = if net > Decimal::ZERO { (i, j) } else { (j, i) };
        Some(Settlement::new(
            participants[debtor].clone(),
            participants[creditor].clone(),
            net.abs(),
        ))
    }
}

/// Index of the first balance that beats every other under `better`.
fn extreme(balances: &[Decimal], better: impl Fn(Decimal, Decimal) -> bool) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, &balance) in balances.iter().enumerate() {
        match best {
            Some(b) if !better(balance, balances[b]) => {}
            _ => best = Some(idx),
        }
    }
    best
}

fn sort_by_position(graph: &ObligationGraph, settlements: &mut [Settlement]) {
    let position = |id: &ParticipantId| graph.index_of(id).unwrap_or(usize::MAX);
    settlements.sort_by_key(|s| (position(&s.debtor), position(&s.creditor)));
}
