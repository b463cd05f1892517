//! Protocol constants. Durations in seconds, amounts in token base units.

use crate::types::Amount;

pub const SECONDS_PER_DAY: u64 = 86_400;
pub const SECONDS_PER_WEEK: u64 = 7 * SECONDS_PER_DAY;

/// Minimum time between the previous checkpoint (or deployment) and a payout.
pub const DEFAULT_PAYOUT_GATE_SECS: u64 = 5 * SECONDS_PER_DAY;

/// Minimum time between a payout and the checkpoint that rolls the epoch.
pub const DEFAULT_CHECKPOINT_GATE_SECS: u64 = 2 * SECONDS_PER_DAY;

/// Number of weekly payouts in the reference schedule.
pub const DEFAULT_SCHEDULE_WEEKS: u32 = 48;

/// Terminal payout of the reference schedule, in whole tokens.
pub const DEFAULT_FLOOR_TOKENS: u64 = 10;

/// Decimals of the reference reward token.
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// Largest decimals value for which `10^decimals` fits in an [`Amount`].
pub const MAX_TOKEN_DECIMALS: u8 = 38;

/// Deposit that funds the reference schedule exactly, in whole tokens.
///
/// # Examples
///
/// ```
/// use drip_core::constants::{REFERENCE_DEPOSIT_TOKENS, DEFAULT_FLOOR_TOKENS, DEFAULT_SCHEDULE_WEEKS};
/// // A ramp 480, 470, ..., 10 sums to 10 * (1 + 2 + ... + 48).
/// let weeks = DEFAULT_SCHEDULE_WEEKS as u64;
/// assert_eq!(REFERENCE_DEPOSIT_TOKENS, DEFAULT_FLOOR_TOKENS * weeks * (weeks + 1) / 2);
/// ```
pub const REFERENCE_DEPOSIT_TOKENS: u64 = 11_760;

/// `10^decimals` as an [`Amount`], or `None` on overflow.
pub fn unit(decimals: u8) -> Option<Amount> {
    10u128.checked_pow(decimals as u32)
}
