//! Currency rounding policy shared by splitting, extraction and netting.
//!
//! Every amount is a [`Decimal`] carried at two decimal places. Totals are
//! rounded half-up, computed per-person shares are rounded up (ceiling) and
//! the resulting over-allocation is handed back through the first
//! participant, so that a set of shares always adds up to its total exactly.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Decimal places carried by every monetary amount.
pub const SCALE: u32 = 2;

/// Tolerance for comparing a target total with a sum of parts. Settlement
/// amounts at or below this value are discarded as rounding noise.
pub const TOLERANCE: Decimal = dec!(0.01);

/// Round a total to two places, midpoint away from zero (half-up for
/// positive amounts).
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a computed share up to the next cent.
pub fn ceil_share(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(SCALE, RoundingStrategy::ToPositiveInfinity)
}

/// Whether two amounts agree within [`TOLERANCE`].
pub fn approx_eq(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= TOLERANCE
}

/// Whether an amount is too small to be worth a transfer.
pub fn is_noise(amount: Decimal) -> bool {
    amount.abs() <= TOLERANCE
}

/// Render an amount with exactly two decimal places.
pub fn format_amount(amount: Decimal) -> String {
    format!("{:.2}", round_amount(amount))
}

/// Turn unrounded per-person shares into cent amounts summing to `total`.
///
/// Each share is rounded up, then the residual `total - sum(shares)` is
/// applied to the first share. When that would make the first share
/// negative it is clamped at zero and the rest carries to the next one.
/// Every returned share is carried at two decimal places, zeros included.
///
/// # Examples
///
/// ```
/// use split_settle::core::money::allocate;
/// use rust_decimal_macros::dec;
///
/// let third = dec!(10) / dec!(3);
/// let shares = allocate(dec!(10), &[third, third, third]);
/// assert_eq!(shares, vec![dec!(3.32), dec!(3.34), dec!(3.34)]);
/// ```
pub fn allocate(total: Decimal, raw_shares: &[Decimal]) -> Vec<Decimal> {
    let total = round_amount(total);
    let mut shares: Vec<Decimal> = raw_shares.iter().map(|s| ceil_share(*s)).collect();
    let mut residual = total - shares.iter().sum::<Decimal>();

    for share in shares.iter_mut() {
        if residual == Decimal::ZERO {
            break;
        }
        let adjusted = *share + residual;
        if adjusted >= Decimal::ZERO {
            *share = adjusted;
            residual = Decimal::ZERO;
        } else {
            residual = adjusted;
            *share = Decimal::ZERO;
        }
    }
    for share in shares.iter_mut() {
        share.rescale(SCALE);
    }
    shares
}
