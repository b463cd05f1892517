//! Integer linear ramp down to a fixed floor.
//!
//! With `w` weeks left, a floor `F` and a step `s`, the ramp pays
//! `F + (w-1)s, F + (w-2)s, ..., F + s, F`, which sums to
//! `w*F + s * w(w-1)/2`. Each payout re-derives `s` from the balance actually
//! held, so rounding never accumulates across weeks:
//!
//! ```text
//! excess    = held - w*F
//! triangle  = w(w-1)/2
//! step      = excess / triangle
//! remainder = excess % triangle      (paid with the first week it appears in)
//! amount    = F + (w-1)*step + remainder
//! ```
//!
//! After paying `amount` the remaining excess is exactly `step * (w-1)(w-2)/2`,
//! so every later week sees the same step and no remainder. The last week
//! (`w == 1`) always pays exactly `F`.

use drip_core::error::ScheduleError;
use drip_core::types::Amount;

/// `w(w-1)/2`: the number of step units above the floor across `w` weeks.
fn triangle(weeks: u32) -> Amount {
    let w = weeks as Amount;
    // u32::MAX^2 fits comfortably in u128.
    w * w.saturating_sub(1) / 2
}

/// Smallest balance that funds a strictly decreasing ramp of `weeks` payouts
/// ending at `floor` (a step of one base unit).
///
/// # Examples
///
/// ```
/// use drip_schedule::ramp::minimum_funding;
/// assert_eq!(minimum_funding(1, 10).unwrap(), 10);
/// assert_eq!(minimum_funding(3, 10).unwrap(), 10 + 11 + 12);
/// ```
pub fn minimum_funding(weeks: u32, floor: Amount) -> Result<Amount, ScheduleError> {
    floor
        .checked_mul(weeks as Amount)
        .and_then(|floors| floors.checked_add(triangle(weeks)))
        .ok_or(ScheduleError::ArithmeticOverflow)
}

/// Payout for the current week.
///
/// `weeks_remaining` counts the current week. Fails with
/// [`ScheduleError::Exhausted`] at zero weeks and
/// [`ScheduleError::Underfunded`] when `held` cannot fund a strictly
/// decreasing ramp over the weeks left.
///
/// # Examples
///
/// ```
/// use drip_schedule::ramp::payout_amount;
/// // Reference schedule: 11_760 tokens over 48 weeks, floor 10.
/// assert_eq!(payout_amount(48, 11_760, 10).unwrap(), 480);
/// assert_eq!(payout_amount(47, 11_280, 10).unwrap(), 470);
/// assert_eq!(payout_amount(1, 10, 10).unwrap(), 10);
/// ```
pub fn payout_amount(
    weeks_remaining: u32,
    held: Amount,
    floor: Amount,
) -> Result<Amount, ScheduleError> {
    if weeks_remaining == 0 {
        return Err(ScheduleError::Exhausted);
    }
    let need = minimum_funding(weeks_remaining, floor)?;
    if held < need {
        return Err(ScheduleError::Underfunded { have: held, need });
    }
    if weeks_remaining == 1 {
        return Ok(floor);
    }

    let w = weeks_remaining as Amount;
    // held >= need >= w * floor, so neither subtraction can underflow.
    let excess = held - w * floor;
    let tri = triangle(weeks_remaining);
    let step = excess / tri;
    let remainder = excess % tri;

    (w - 1)
        .checked_mul(step)
        .and_then(|ramp| ramp.checked_add(floor))
        .and_then(|amount| amount.checked_add(remainder))
        .ok_or(ScheduleError::ArithmeticOverflow)
}

/// The payout one week before the first: the first payout plus one step.
///
/// Seeds `last_payout_amount` at the start of a run so the first payout is
/// already below it. A one-week ramp has no step and opens at `floor + 1`.
///
/// # Examples
///
/// ```
/// use drip_schedule::ramp::opening_amount;
/// assert_eq!(opening_amount(48, 11_760, 10).unwrap(), 490);
/// assert_eq!(opening_amount(1, 10, 10).unwrap(), 11);
/// ```
pub fn opening_amount(weeks: u32, held: Amount, floor: Amount) -> Result<Amount, ScheduleError> {
    let first = payout_amount(weeks, held, floor)?;
    let step = if weeks < 2 {
        1
    } else {
        // payout_amount succeeded, so held >= weeks * floor.
        (held - weeks as Amount * floor) / triangle(weeks)
    };
    first
        .checked_add(step)
        .ok_or(ScheduleError::ArithmeticOverflow)
}

/// Every payout a deposit would produce over `weeks`, first week first.
///
/// # Examples
///
/// ```
/// use drip_schedule::ramp::project_schedule;
/// assert_eq!(project_schedule(3, 60, 10).unwrap(), vec![30, 20, 10]);
/// ```
pub fn project_schedule(
    weeks: u32,
    deposit: Amount,
    floor: Amount,
) -> Result<Vec<Amount>, ScheduleError> {
    let mut held = deposit;
    let mut payouts = Vec::with_capacity(weeks as usize);
    for remaining in (1..=weeks).rev() {
        let amount = payout_amount(remaining, held, floor)?;
        held -= amount;
        payouts.push(amount);
    }
    Ok(payouts)
}
