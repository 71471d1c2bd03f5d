use crate::core::expense::Expense;
use crate::core::ledger::Ledger;
use crate::core::money;
use crate::core::participant::{Participant, ParticipantId};
use crate::graph::obligation_graph::ObligationGraph;
use crate::settlement::netting::{NettingStrategy, Settlement};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Everything a group needs to square up: balances, the payments that
/// settle them, and how much bookkeeping netting saved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReport {
    pub strategy: NettingStrategy,
    pub participants: Vec<Participant>,
    /// Net balance per participant; positive means owed money.
    pub balances: Ledger,
    pub settlements: Vec<Settlement>,
    pub expense_count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_spent: Decimal,
    /// Sum of all pairwise obligations before any reduction.
    #[serde(with = "rust_decimal::serde::float")]
    pub gross_obligations: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_transferred: Decimal,
    pub generated_at: DateTime<Utc>,
}

impl SettlementReport {
    /// Assemble a report from the unreduced obligation graph and the
    /// settlements computed for it.
    pub fn new(
        participants: &[Participant],
        expenses: &[Expense],
        graph: &ObligationGraph,
        strategy: NettingStrategy,
        settlements: Vec<Settlement>,
    ) -> Self {
        let total_transferred = settlements.iter().map(|s| s.amount).sum();
        SettlementReport {
            strategy,
            participants: participants.to_vec(),
            balances: graph.balances(),
            settlements,
            expense_count: expenses.len(),
            total_spent: expenses.iter().map(Expense::amount).sum(),
            gross_obligations: graph.gross_total(),
            total_transferred,
            generated_at: Utc::now(),
        }
    }

    pub fn transfer_count(&self) -> usize {
        self.settlements.len()
    }

    /// Net balance of one participant.
    pub fn balance(&self, participant: &ParticipantId) -> Decimal {
        self.balances.position(participant)
    }

    /// Whether the settlements move what creditors are owed and nobody
    /// pays themselves. The two totals may differ by the sub-cent amounts
    /// no transfer is made for, bounded by
    /// [`Ledger::settlement_tolerance`].
    pub fn is_conserved(&self) -> bool {
        let gap = self.balances.total_net_settlement() - self.total_transferred;
        self.balances.is_balanced()
            && gap.abs() <= self.balances.settlement_tolerance()
            && self.settlements.iter().all(|s| s.debtor != s.creditor)
    }

    /// Share of the gross obligations that no longer needs a transfer, in
    /// percent.
    pub fn reduction_percent(&self) -> f64 {
        if self.gross_obligations == Decimal::ZERO {
            return 0.0;
        }
        let saved = self.gross_obligations - self.total_transferred;
        (saved * Decimal::from(100) / self.gross_obligations)
            .to_f64()
            .unwrap_or(0.0)
    }

    fn name_of<'a>(&'a self, id: &'a ParticipantId) -> &'a str {
        self.participants
            .iter()
            .find(|p| &p.id == id)
            .map(|p| p.display_name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| id.as_str())
    }
}

impl fmt::Display for SettlementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Settlement Report ===")?;
        writeln!(f, "Generated:      {}", self.generated_at.to_rfc3339())?;
        writeln!(f, "Strategy:       {}", self.strategy)?;
        writeln!(f, "Expenses:       {}", self.expense_count)?;
        writeln!(f, "Total Spent:    {}", money::format_amount(self.total_spent))?;
        writeln!(f, "Gross Owed:     {}", money::format_amount(self.gross_obligations))?;
        writeln!(f, "Transferred:    {}", money::format_amount(self.total_transferred))?;
        writeln!(f, "Reduction:      {:.1}%", self.reduction_percent())?;
        writeln!(f, "Conserved:      {}", self.is_conserved())?;

        writeln!(f, "\nBalances:")?;
        for (id, amount) in self.balances.positions() {
            writeln!(f, "  {:<20} {:>10}", self.name_of(id), money::format_amount(*amount))?;
        }

        writeln!(f, "\nSettlements ({}):", self.transfer_count())?;
        if self.settlements.is_empty() {
            writeln!(f, "  everyone is square")?;
        }
        for s in &self.settlements {
            writeln!(
                f,
                "  {} pays {} {}",
                self.name_of(&s.debtor),
                self.name_of(&s.creditor),
                money::format_amount(s.amount)
            )?;
        }
        Ok(())
    }
}
