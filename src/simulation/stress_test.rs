//! Random expense groups for load testing the settlement engine.

use crate::core::error::Result;
use crate::core::expense::Expense;
use crate::core::participant::{Participant, ParticipantId};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Shape of a generated group.
#[derive(Debug, Clone)]
pub struct GroupConfig {
    pub participant_count: usize,
    pub expense_count: usize,
    /// Smallest expense amount.
    pub min_amount: Decimal,
    /// Largest expense amount.
    pub max_amount: Decimal,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            participant_count: 6,
            expense_count: 20,
            min_amount: dec!(5),
            max_amount: dec!(500),
        }
    }
}

/// Generate a random group with the thread-local RNG.
pub fn generate_random_group(config: &GroupConfig) -> Result<(Vec<Participant>, Vec<Expense>)> {
    generate_random_group_with(&mut rand::thread_rng(), config)
}

/// Generate a random group from a caller-supplied RNG, so a seeded RNG
/// gives a reproducible group.
///
/// Expenses cycle through even, uneven and percentage splits, each shared
/// by a random non-empty subset of the group.
pub fn generate_random_group_with<R: Rng>(
    rng: &mut R,
    config: &GroupConfig,
) -> Result<(Vec<Participant>, Vec<Expense>)> {
    let participants: Vec<Participant> = (0..config.participant_count)
        .map(|i| Participant::new(format!("P{:03}", i), format!("Person {}", i)))
        .collect();
    let ids: Vec<ParticipantId> = participants.iter().map(|p| p.id.clone()).collect();
    if ids.is_empty() {
        return Ok((participants, Vec::new()));
    }

    let min_cents = to_cents(config.min_amount).max(1);
    let max_cents = to_cents(config.max_amount).max(min_cents);

    let mut expenses = Vec::with_capacity(config.expense_count);
    for n in 0..config.expense_count {
        let payer = ids[rng.gen_range(0..ids.len())].clone();
        let cents = rng.gen_range(min_cents..=max_cents);
        let amount = Decimal::new(cents, 2);
        let sharers = pick_sharers(rng, &ids);

        let expense = match n % 3 {
            0 => Expense::even(payer, amount, &sharers)?,
            1 => {
                let parts = random_parts(rng, cents, sharers.len());
                let amounts: Vec<(ParticipantId, Decimal)> = sharers
                    .into_iter()
                    .zip(parts)
                    .map(|(id, part)| (id, Decimal::new(part, 2)))
                    .collect();
                Expense::uneven(payer, amount, &amounts)?
            }
            _ => {
                // basis points, so the percentages add up to exactly 100
                let parts = random_parts(rng, 10_000, sharers.len());
                let percentages: Vec<(ParticipantId, Decimal)> = sharers
                    .into_iter()
                    .zip(parts)
                    .map(|(id, bp)| (id, Decimal::new(bp, 2)))
                    .collect();
                Expense::percentage(payer, amount, &percentages)?
            }
        };
        expenses.push(expense.with_description(format!("generated expense {}", n)));
    }

    log::debug!(
        "generated {} expenses across {} participants",
        expenses.len(),
        participants.len()
    );
    Ok((participants, expenses))
}

fn to_cents(amount: Decimal) -> i64 {
    (amount * Decimal::from(100)).trunc().to_i64().unwrap_or(0)
}

/// A non-empty random subset of `ids`, in group order.
fn pick_sharers<R: Rng>(rng: &mut R, ids: &[ParticipantId]) -> Vec<ParticipantId> {
    let count = rng.gen_range(1..=ids.len());
    let mut picked: Vec<usize> = (0..ids.len()).collect();
    picked.shuffle(rng);
    picked.truncate(count);
    picked.sort_unstable();
    picked.into_iter().map(|i| ids[i].clone()).collect()
}

/// Cut `total` into `count` non-negative integer parts at random points.
fn random_parts<R: Rng>(rng: &mut R, total: i64, count: usize) -> Vec<i64> {
    let mut cuts: Vec<i64> = (1..count).map(|_| rng.gen_range(0..=total)).collect();
    cuts.push(0);
    cuts.push(total);
    cuts.sort_unstable();
    cuts.windows(2).map(|w| w[1] - w[0]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::extractor::extract;
    use crate::settlement::netting::NettingEngine;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_group_generation() {
        let config = GroupConfig {
            participant_count: 5,
            expense_count: 12,
            ..Default::default()
        };
        let (participants, expenses) = generate_random_group(&config).unwrap();
        assert_eq!(participants.len(), 5);
        assert_eq!(expenses.len(), 12);
        assert!(expenses.iter().all(|e| e.validate().is_ok()));
        assert!(expenses
            .iter()
            .all(|e| e.amount() >= config.min_amount && e.amount() <= config.max_amount));
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let config = GroupConfig::default();
        let (_, first) = generate_random_group_with(&mut StdRng::seed_from_u64(7), &config).unwrap();
        let (_, second) =
            generate_random_group_with(&mut StdRng::seed_from_u64(7), &config).unwrap();
        let amounts = |xs: &[Expense]| xs.iter().map(Expense::amount).collect::<Vec<_>>();
        assert_eq!(amounts(&first), amounts(&second));
    }

    #[test]
    fn test_random_group_settles() {
        let config = GroupConfig {
            participant_count: 20,
            expense_count: 100,
            ..Default::default()
        };
        let (participants, expenses) = generate_random_group(&config).unwrap();
        let graph = extract(&participants, &expenses).unwrap();
        let settlements = NettingEngine::aggregate_net(&graph);

        assert!(graph.balances().is_balanced());
        assert!(settlements.len() < participants.len());
        let moved: Decimal = settlements.iter().map(|s| s.amount).sum();
        assert!(moved <= graph.gross_total());
    }

    #[test]
    fn test_random_parts_sum() {
        let mut rng = StdRng::seed_from_u64(1);
        let parts = random_parts(&mut rng, 1234, 4);
        assert_eq!(parts.len(), 4);
        assert_eq!(parts.iter().sum::<i64>(), 1234);
        assert!(parts.iter().all(|p| *p >= 0));
    }
}
