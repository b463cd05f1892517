//! Payout engine implementing the [`PayoutCurve`] trait.

use drip_core::error::ScheduleError;
use drip_core::traits::PayoutCurve;
use drip_core::types::Amount;
use tracing::trace;

use crate::ramp;

/// The production payout curve: a linear ramp re-derived from the held
/// balance every week. See [`ramp`](crate::ramp) for the arithmetic.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearRamp;

impl LinearRamp {
    pub fn new() -> Self {
        Self
    }
}

impl PayoutCurve for LinearRamp {
    fn payout_amount(
        &self,
        weeks_remaining: u32,
        held: Amount,
        floor: Amount,
    ) -> Result<Amount, ScheduleError> {
        let amount = ramp::payout_amount(weeks_remaining, held, floor)?;
        trace!(weeks_remaining, %held, %amount, "sized weekly payout");
        Ok(amount)
    }

    fn minimum_funding(&self, weeks: u32, floor: Amount) -> Result<Amount, ScheduleError> {
        ramp::minimum_funding(weeks, floor)
    }

    fn opening_amount(
        &self,
        weeks: u32,
        held: Amount,
        floor: Amount,
    ) -> Result<Amount, ScheduleError> {
        ramp::opening_amount(weeks, held, floor)
    }

    fn project(
        &self,
        weeks: u32,
        deposit: Amount,
        floor: Amount,
    ) -> Result<Vec<Amount>, ScheduleError> {
        ramp::project_schedule(weeks, deposit, floor)
    }
}
