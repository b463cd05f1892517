//! # drip-schedule: decaying weekly payout curve.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! - **Linear ramp**: payouts fall by a fixed step each week and end at an
//!   exact floor amount.
//! - **Balance re-derivation**: every payout is recomputed from the balance
//!   currently held and the weeks left, so integer rounding cannot drift and
//!   the final payout leaves the balance at zero.

pub mod engine;
pub mod ramp;

pub use engine::LinearRamp;
pub use ramp::{minimum_funding, opening_amount, payout_amount, project_schedule};
