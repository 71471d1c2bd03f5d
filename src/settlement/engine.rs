use crate::config::EngineConfig;
use crate::core::error::Result;
use crate::core::expense::Expense;
use crate::core::participant::Participant;
use crate::graph::extractor::extract;
use crate::graph::obligation_graph::ObligationGraph;
use crate::settlement::netting::{NettingEngine, NettingStrategy, Settlement};
use crate::settlement::report::SettlementReport;

/// Front door of the library: expenses in, payments out.
///
/// Every call works on the snapshot it is given and keeps no state
/// between calls.
///
/// # Examples
///
/// ```
/// use split_settle::core::expense::Expense;
/// use split_settle::core::participant::{Participant, ParticipantId};
/// use split_settle::settlement::engine::SettlementEngine;
/// use rust_decimal_macros::dec;
///
/// let group = vec![Participant::new("a", "Ann"), Participant::new("b", "Ben")];
/// let ids: Vec<ParticipantId> = group.iter().map(|p| p.id.clone()).collect();
/// let taxi = Expense::even(ids[0].clone(), dec!(24), &ids).unwrap();
///
/// let payments = SettlementEngine::default().settle(&group, &[taxi]).unwrap();
/// assert_eq!(payments.len(), 1);
/// assert_eq!(payments[0].amount, dec!(12));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    config: EngineConfig,
}

impl SettlementEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Raw pairwise obligations, before any reduction.
    pub fn obligation_graph(
        &self,
        participants: &[Participant],
        expenses: &[Expense],
    ) -> Result<ObligationGraph> {
        extract(participants, expenses)
    }

    /// Obligations after whichever of cycle cancellation and chain collapse
    /// the config enables.
    pub fn reduced_graph(
        &self,
        participants: &[Participant],
        expenses: &[Expense],
    ) -> Result<ObligationGraph> {
        let mut graph = extract(participants, expenses)?;
        self.reduce(&mut graph);
        Ok(graph)
    }

    /// Settle with the configured strategy.
    pub fn settle(
        &self,
        participants: &[Participant],
        expenses: &[Expense],
    ) -> Result<Vec<Settlement>> {
        self.settle_with(participants, expenses, self.config.strategy)
    }

    /// Settle with an explicit strategy. Pairwise netting runs on the
    /// reduced graph; greedy netting only needs balances and runs on the
    /// raw graph.
    pub fn settle_with(
        &self,
        participants: &[Participant],
        expenses: &[Expense],
        strategy: NettingStrategy,
    ) -> Result<Vec<Settlement>> {
        let graph = extract(participants, expenses)?;
        let settlements = self.net(&graph, strategy);
        log::info!(
            "settled {} expenses among {} participants: {} transfers ({})",
            expenses.len(),
            graph.len(),
            settlements.len(),
            strategy
        );
        Ok(settlements)
    }

    /// The group "who owes whom" view: reduction then pairwise netting.
    pub fn who_owes_whom(
        &self,
        participants: &[Participant],
        expenses: &[Expense],
    ) -> Result<Vec<Settlement>> {
        self.settle_with(participants, expenses, NettingStrategy::PairwiseDirect)
    }

    /// Full settlement report with the configured strategy.
    pub fn report(
        &self,
        participants: &[Participant],
        expenses: &[Expense],
    ) -> Result<SettlementReport> {
        let graph = extract(participants, expenses)?;
        let settlements = self.net(&graph, self.config.strategy);
        let report = SettlementReport::new(
            participants,
            expenses,
            &graph,
            self.config.strategy,
            settlements,
        );
        log::info!(
            "report: {} transfers move {} of {} gross obligations",
            report.transfer_count(),
            report.total_transferred,
            report.gross_obligations
        );
        Ok(report)
    }

    fn net(&self, graph: &ObligationGraph, strategy: NettingStrategy) -> Vec<Settlement> {
        match strategy {
            NettingStrategy::PairwiseDirect => {
                let mut reduced = graph.clone();
                self.reduce(&mut reduced);
                NettingEngine::settle(&reduced, strategy)
            }
            NettingStrategy::AggregateGreedy => NettingEngine::settle(graph, strategy),
        }
    }

    fn reduce(&self, graph: &mut ObligationGraph) {
        self.config.reducer().reduce_in_place(graph);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::expense::{Split, SplitType};
    use crate::core::participant::ParticipantId;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn group(names: &[&str]) -> Vec<Participant> {
        names.iter().map(|n| Participant::new(*n, *n)).collect()
    }

    fn pid(name: &str) -> ParticipantId {
        ParticipantId::new(name)
    }

    fn paid(payer: &str, amount: Decimal, debtor: &str) -> Expense {
        Expense::new(
            pid(payer),
            amount,
            SplitType::Uneven,
            vec![Split::new(pid(debtor), amount)],
        )
    }

    #[test]
    fn test_chain_settles_directly() {
        // B owes A 10, C owes B 10: only C pays A
        let members = group(&["A", "B", "C"]);
        let expenses = vec![paid("A", dec!(10), "B"), paid("B", dec!(10), "C")];
        let engine = SettlementEngine::default();

        let pairwise = engine.who_owes_whom(&members, &expenses).unwrap();
        assert_eq!(pairwise, vec![Settlement::new(pid("C"), pid("A"), dec!(10))]);

        let greedy = engine.settle(&members, &expenses).unwrap();
        assert_eq!(greedy, pairwise);
    }

    #[test]
    fn test_reduced_graph_has_no_chain() {
        let members = group(&["A", "B", "C"]);
        let expenses = vec![paid("A", dec!(10), "B"), paid("B", dec!(10), "C")];
        let engine = SettlementEngine::default();
        assert!(engine.obligation_graph(&members, &expenses).unwrap().has_chain());
        assert!(!engine.reduced_graph(&members, &expenses).unwrap().has_chain());
    }

    #[test]
    fn test_reduction_disabled() {
        let members = group(&["A", "B", "C"]);
        let expenses = vec![paid("A", dec!(10), "B"), paid("B", dec!(10), "C")];
        let config = EngineConfig {
            collapse_chains: false,
            ..EngineConfig::default()
        };
        let settlements = SettlementEngine::new(config)
            .settle_with(&members, &expenses, NettingStrategy::PairwiseDirect)
            .unwrap();
        assert_eq!(settlements.len(), 2);
    }

    #[test]
    fn test_cycles_cancelled_with_chain_collapse_off() {
        // A owes B 10 and B owes A 4: the two-party cycle still nets out
        let members = group(&["A", "B"]);
        let expenses = vec![paid("B", dec!(10), "A"), paid("A", dec!(4), "B")];
        let config = EngineConfig {
            collapse_chains: false,
            ..EngineConfig::default()
        };
        let engine = SettlementEngine::new(config);

        let reduced = engine.reduced_graph(&members, &expenses).unwrap();
        assert_eq!(reduced.amount(&pid("A"), &pid("B")), dec!(6));
        assert_eq!(reduced.amount(&pid("B"), &pid("A")), Decimal::ZERO);

        let raw = SettlementEngine::new(EngineConfig {
            cancel_cycles: false,
            collapse_chains: false,
            ..EngineConfig::default()
        })
        .reduced_graph(&members, &expenses)
        .unwrap();
        assert_eq!(raw.amount(&pid("B"), &pid("A")), dec!(4));
    }

    #[test]
    fn test_invalid_expense_aborts() {
        let members = group(&["A", "B"]);
        let expenses = vec![paid("A", dec!(10), "Z")];
        assert!(SettlementEngine::default().settle(&members, &expenses).is_err());
    }

    #[test]
    fn test_report_uses_configured_strategy() {
        let members = group(&["A", "B"]);
        let expenses = vec![paid("A", dec!(10), "B")];
        let engine = SettlementEngine::new(
            EngineConfig::default().with_strategy(NettingStrategy::PairwiseDirect),
        );
        let report = engine.report(&members, &expenses).unwrap();
        assert_eq!(report.strategy, NettingStrategy::PairwiseDirect);
        assert_eq!(report.transfer_count(), 1);
        assert!(report.is_conserved());
    }
}
