use crate::core::error::{Result, SettlementError};
use crate::core::expense::Split;
use crate::core::money;
use crate::core::participant::ParticipantId;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Split `amount` evenly among `participants`.
///
/// Shares are rounded up to the cent and the over-allocation is taken back
/// from the first participant, so the shares add up to `amount` exactly.
/// Repeated identifiers are counted once.
///
/// # Examples
///
/// ```
/// use split_settle::core::participant::ParticipantId;
/// use split_settle::split::even_split;
/// use rust_decimal_macros::dec;
///
/// let people = vec![ParticipantId::new("a"), ParticipantId::new("b"), ParticipantId::new("c")];
/// let splits = even_split(dec!(100), &people).unwrap();
/// let amounts: Vec<_> = splits.iter().map(|s| s.amount).collect();
/// assert_eq!(amounts, vec![dec!(33.32), dec!(33.34), dec!(33.34)]);
/// ```
pub fn even_split(amount: Decimal, participants: &[ParticipantId]) -> Result<Vec<Split>> {
    let participants = dedup(participants);
    if participants.is_empty() {
        return Err(SettlementError::degenerate(
            "even split needs at least one participant",
        ));
    }
    if amount <= Decimal::ZERO {
        return Err(SettlementError::invalid(format!(
            "split amount must be positive, got {}",
            amount
        )));
    }

    let per_person = money::round_amount(amount) / Decimal::from(participants.len());
    let shares = money::allocate(amount, &vec![per_person; participants.len()]);
    Ok(zip_splits(participants, shares))
}

/// Split `amount` by percentage. Percentages must add up to 100 within the
/// rounding tolerance.
pub fn percentage_split(
    amount: Decimal,
    percentages: &[(ParticipantId, Decimal)],
) -> Result<Vec<Split>> {
    if percentages.is_empty() {
        return Err(SettlementError::degenerate(
            "percentage split needs at least one participant",
        ));
    }
    if amount <= Decimal::ZERO {
        return Err(SettlementError::invalid(format!(
            "split amount must be positive, got {}",
            amount
        )));
    }
    if let Some((participant, pct)) = percentages.iter().find(|(_, pct)| *pct < Decimal::ZERO) {
        return Err(SettlementError::invalid(format!(
            "negative percentage {} for {}",
            pct, participant
        )));
    }

    let total_pct: Decimal = percentages.iter().map(|(_, pct)| *pct).sum();
    if !money::approx_eq(total_pct, dec!(100)) {
        return Err(SettlementError::SplitMismatch {
            declared: total_pct,
            expected: dec!(100),
        });
    }

    let rounded = money::round_amount(amount);
    let raw: Vec<Decimal> = percentages
        .iter()
        .map(|(_, pct)| rounded * *pct / dec!(100))
        .collect();
    let shares = money::allocate(rounded, &raw);
    let participants = percentages.iter().map(|(p, _)| p.clone()).collect();
    Ok(zip_splits(participants, shares))
}

/// Take explicit per-person amounts as entered. Zero entries are dropped;
/// the rest must add up to `amount` within the rounding tolerance.
pub fn uneven_split(amount: Decimal, amounts: &[(ParticipantId, Decimal)]) -> Result<Vec<Split>> {
    if amount <= Decimal::ZERO {
        return Err(SettlementError::invalid(format!(
            "split amount must be positive, got {}",
            amount
        )));
    }
    if let Some((participant, value)) = amounts.iter().find(|(_, v)| *v < Decimal::ZERO) {
        return Err(SettlementError::invalid(format!(
            "negative amount {} for {}",
            value, participant
        )));
    }

    let splits: Vec<Split> = amounts
        .iter()
        .filter(|(_, v)| *v != Decimal::ZERO)
        .map(|(p, v)| Split::new(p.clone(), money::round_amount(*v)))
        .collect();
    if splits.is_empty() {
        return Err(SettlementError::degenerate(
            "uneven split has no non-zero amounts",
        ));
    }

    let total: Decimal = splits.iter().map(|s| s.amount).sum();
    let expected = money::round_amount(amount);
    if !money::approx_eq(total, expected) {
        return Err(SettlementError::SplitMismatch {
            declared: total,
            expected,
        });
    }
    Ok(splits)
}

pub(crate) fn dedup(participants: &[ParticipantId]) -> Vec<ParticipantId> {
    let mut unique: Vec<ParticipantId> = Vec::with_capacity(participants.len());
    for p in participants {
        if !unique.contains(p) {
            unique.push(p.clone());
        }
    }
    unique
}

pub(crate) fn zip_splits(participants: Vec<ParticipantId>, shares: Vec<Decimal>) -> Vec<Split> {
    participants
        .into_iter()
        .zip(shares)
        .map(|(p, amount)| Split::new(p, amount))
        .collect()
}
