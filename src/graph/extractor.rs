use crate::core::error::{Result, SettlementError};
use crate::core::expense::Expense;
use crate::core::money;
use crate::core::participant::Participant;
use crate::graph::obligation_graph::ObligationGraph;
use rust_decimal::Decimal;

/// Build the pairwise obligation graph for a group.
///
/// Every participant gets a row and a column even without expenses. For
/// each expense, every split whose participant is not the payer adds its
/// amount (rounded to the cent) to the edge from that participant to the
/// payer. The payer's own share never produces an edge.
///
/// All expenses are validated before anything is accumulated; the first
/// malformed expense fails the whole batch.
///
/// # Examples
///
/// ```
/// use split_settle::core::expense::Expense;
/// use split_settle::core::participant::{Participant, ParticipantId};
/// use split_settle::graph::extractor::extract;
/// use rust_decimal_macros::dec;
///
/// let group = vec![Participant::new("a", "Ann"), Participant::new("b", "Ben")];
/// let ids: Vec<ParticipantId> = group.iter().map(|p| p.id.clone()).collect();
/// let lunch = Expense::even(ids[0].clone(), dec!(20), &ids).unwrap();
///
/// let graph = extract(&group, &[lunch]).unwrap();
/// assert_eq!(graph.amount(&ids[1], &ids[0]), dec!(10));
/// ```
pub fn extract(participants: &[Participant], expenses: &[Expense]) -> Result<ObligationGraph> {
    let mut graph = ObligationGraph::new(participants.iter().map(|p| p.id.clone()).collect());

    for expense in expenses {
        validate_against(&graph, expense).map_err(|err| {
            log::warn!("rejecting expense {}: {}", expense.id(), err);
            err
        })?;
    }

    for expense in expenses {
        let payer = graph
            .index_of(expense.payer())
            .ok_or_else(|| unknown(expense, expense.payer().as_str()))?;
        for split in expense.splits() {
            let debtor = graph
                .index_of(&split.participant)
                .ok_or_else(|| unknown(expense, split.participant.as_str()))?;
            if debtor == payer {
                continue;
            }
            let amount = money::round_amount(split.amount);
            if amount > Decimal::ZERO {
                graph.add_weight(debtor, payer, amount);
            }
        }
    }

    log::debug!(
        "extracted {} edges from {} expenses over {} participants",
        graph.edge_count(),
        expenses.len(),
        graph.len()
    );
    Ok(graph)
}

fn validate_against(graph: &ObligationGraph, expense: &Expense) -> Result<()> {
    if let Some(stranger) = expense
        .referenced_participants()
        .find(|p| !graph.contains(p))
    {
        return Err(unknown(expense, stranger.as_str()));
    }
    expense.validate()
}

fn unknown(expense: &Expense, participant: &str) -> SettlementError {
    SettlementError::invalid(format!(
        "expense {} references unknown participant {}",
        expense.id(),
        participant
    ))
}
