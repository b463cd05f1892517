//! Payout scheduler: the weekly payout/checkpoint state machine.
//!
//! Each week splits into two gated half-cycles:
//!
//! ```text
//! AwaitingPayout ──(payout_gate elapsed)──▶ pay, AwaitingCheckpoint
//! AwaitingCheckpoint ──(checkpoint_gate elapsed)──▶ weeks -= 1, AwaitingPayout
//! ```
//!
//! Gates are measured from the previous transition, so a keeper calling on an
//! irregular cadence can never double-pay or skip a checkpoint. An early call
//! fails with [`RewardsError::EpochNotReady`] and changes nothing.

use drip_core::error::RewardsError;
use drip_core::traits::{AssetLedger, FeeDistributor, PayoutCurve};
use drip_core::types::{Address, Amount, Phase, Timestamp};
use tracing::{debug, info, warn};

use crate::manager::RewardsManager;

/// What a successful [`advance`](RewardsManager::advance) did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Released `amount` to the destination; `weeks_remaining` includes this week.
    Paid { amount: Amount, weeks_remaining: u32 },
    /// Closed the week.
    Checkpointed { weeks_remaining: u32 },
}

impl<L: AssetLedger, F: FeeDistributor, C: PayoutCurve> RewardsManager<L, F, C> {
    /// Run the next half-cycle if its gate has elapsed.
    ///
    /// Callable by the owner or an authorized manager.
    pub fn advance(
        &mut self,
        caller: &Address,
        now: Timestamp,
    ) -> Result<AdvanceOutcome, RewardsError> {
        if !self.state.can_advance(caller) {
            debug!(%caller, "rejected advance: caller not authorized");
            return Err(RewardsError::Unauthorized { caller: *caller });
        }
        if self.state.is_exhausted() {
            debug!(now, "rejected advance: schedule exhausted");
            return Err(RewardsError::ScheduleExhausted);
        }
        let ready_at = self.state.ready_at();
        if now < ready_at {
            debug!(now, ready_at, phase = %self.state.phase, "rejected advance: gate not elapsed");
            return Err(RewardsError::EpochNotReady { now, ready_at });
        }

        match self.state.phase {
            Phase::AwaitingPayout => self.pay_out(now),
            Phase::AwaitingCheckpoint => Ok(self.checkpoint(now)),
        }
    }

    fn pay_out(&mut self, now: Timestamp) -> Result<AdvanceOutcome, RewardsError> {
        let asset = self.state.reward_asset;
        let weeks_remaining = self.state.weeks_remaining;
        let held = self.ledger.balance_of(&asset, &self.address);
        let mut amount = self
            .curve
            .payout_amount(weeks_remaining, held, self.state.schedule.floor)?;
        // Funds that arrive mid-run never raise a payout; they stay for a sweep.
        let ceiling = self.state.last_payout_amount;
        if ceiling > 0 && amount >= ceiling {
            debug!(%amount, %ceiling, "payout capped below previous payout");
            amount = ceiling - 1;
        }

        if let Err(e) = self
            .ledger
            .transfer(&asset, &self.address, &self.state.destination, amount)
        {
            warn!(%amount, destination = %self.state.destination, "payout transfer failed: {e}");
            return Err(RewardsError::TransferFailed(e));
        }

        self.state.last_payout_amount = amount;
        self.state.last_transition_time = now;
        self.state.phase = Phase::AwaitingCheckpoint;
        info!(%amount, weeks_remaining, now, "weekly payout released");
        Ok(AdvanceOutcome::Paid {
            amount,
            weeks_remaining,
        })
    }

    fn checkpoint(&mut self, now: Timestamp) -> AdvanceOutcome {
        // AwaitingCheckpoint is only entered by a payout, which needs a week left.
        self.state.weeks_remaining = self.state.weeks_remaining.saturating_sub(1);
        self.state.last_transition_time = now;
        self.state.phase = Phase::AwaitingPayout;
        info!(weeks_remaining = self.state.weeks_remaining, now, "epoch checkpointed");
        AdvanceOutcome::Checkpointed {
            weeks_remaining: self.state.weeks_remaining,
        }
    }

    /// Re-arm an exhausted schedule for `new_weeks` more weeks, starting the
    /// payout gate at `now`. Owner only.
    ///
    /// The new run pays out whatever balance is held when each week comes up,
    /// so funds should be deposited before the first payout gate elapses.
    pub fn reset_schedule(
        &mut self,
        caller: &Address,
        new_weeks: u32,
        now: Timestamp,
    ) -> Result<(), RewardsError> {
        self.require_owner(caller, "reset_schedule")?;
        if new_weeks == 0 {
            return Err(RewardsError::InvalidSchedule(
                "schedule must span at least one week".into(),
            ));
        }
        if !self.state.is_exhausted() {
            return Err(RewardsError::ScheduleActive {
                weeks_remaining: self.state.weeks_remaining,
            });
        }

        self.state.weeks_remaining = new_weeks;
        self.state.phase = Phase::AwaitingPayout;
        self.state.last_transition_time = now;
        self.state.last_payout_amount = self.opening_amount(new_weeks);
        info!(new_weeks, now, "schedule reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::tests::*;
    use drip_core::constants::{DEFAULT_CHECKPOINT_GATE_SECS, DEFAULT_PAYOUT_GATE_SECS};

    const PAY: Timestamp = DEFAULT_PAYOUT_GATE_SECS;
    const CHECK: Timestamp = DEFAULT_CHECKPOINT_GATE_SECS;

    // --- gating ---

    #[test]
    fn payout_before_gate_is_not_ready() {
        let mut m = funded(48, 11_760);
        let before = m.state().clone();
        let err = m.advance(&KEEPER, T0 + PAY - 1).unwrap_err();
        assert_eq!(
            err,
            RewardsError::EpochNotReady {
                now: T0 + PAY - 1,
                ready_at: T0 + PAY
            }
        );
        assert_eq!(m.state(), &before);
        assert_eq!(m.held_balance(), 11_760);
    }

    #[test]
    fn payout_exactly_at_gate() {
        let mut m = funded(48, 11_760);
        let outcome = m.advance(&KEEPER, T0 + PAY).unwrap();
        assert_eq!(
            outcome,
            AdvanceOutcome::Paid {
                amount: 480,
                weeks_remaining: 48
            }
        );
        assert_eq!(m.phase(), Phase::AwaitingCheckpoint);
        assert_eq!(m.last_payout_amount(), 480);
        assert_eq!(m.last_transition_time(), T0 + PAY);
        assert_eq!(m.ledger().balance_of(&ASSET, &DESTINATION), 480);
        assert_eq!(m.held_balance(), 11_280);
    }

    #[test]
    fn second_call_after_payout_waits_for_checkpoint_gate() {
        let mut m = funded(48, 11_760);
        m.advance(&KEEPER, T0 + 6 * 86_400).unwrap();
        let after_payout = m.state().clone();
        assert!(matches!(
            m.advance(&KEEPER, T0 + 6 * 86_400 + 1),
            Err(RewardsError::EpochNotReady { .. })
        ));
        assert_eq!(m.state(), &after_payout);
    }

    #[test]
    fn checkpoint_decrements_weeks() {
        let mut m = funded(48, 11_760);
        m.advance(&KEEPER, T0 + PAY).unwrap();
        let outcome = m.advance(&KEEPER, T0 + PAY + CHECK).unwrap();
        assert_eq!(outcome, AdvanceOutcome::Checkpointed { weeks_remaining: 47 });
        assert_eq!(m.phase(), Phase::AwaitingPayout);
        assert_eq!(m.last_payout_amount(), 480);
        assert_eq!(m.held_balance(), 11_280);
    }

    #[test]
    fn time_before_last_transition_is_not_ready() {
        let mut m = funded(2, 100);
        assert!(matches!(
            m.advance(&KEEPER, T0 - 10),
            Err(RewardsError::EpochNotReady { .. })
        ));
    }

    #[test]
    fn late_calls_measure_from_previous_transition() {
        let mut m = funded(3, 60);
        // Keeper shows up very late: payout still only happens once.
        let late = T0 + 30 * 86_400;
        m.advance(&KEEPER, late).unwrap();
        assert!(m.advance(&KEEPER, late + CHECK - 1).is_err());
        m.advance(&KEEPER, late + CHECK).unwrap();
        assert_eq!(m.weeks_remaining(), 2);
    }

    // --- authorization ---

    #[test]
    fn stranger_cannot_advance() {
        let mut m = funded(48, 11_760);
        let before = m.state().clone();
        assert_eq!(
            m.advance(&STRANGER, T0 + PAY),
            Err(RewardsError::Unauthorized { caller: STRANGER })
        );
        assert_eq!(m.state(), &before);
    }

    #[test]
    fn owner_can_advance() {
        let mut m = funded(48, 11_760);
        assert!(m.advance(&OWNER, T0 + PAY).is_ok());
    }

    #[test]
    fn deauthorized_keeper_cannot_advance() {
        let mut m = funded(48, 11_760);
        m.set_authorized(&OWNER, KEEPER, false).unwrap();
        assert!(matches!(
            m.advance(&KEEPER, T0 + PAY),
            Err(RewardsError::Unauthorized { .. })
        ));
    }

    // --- schedule ---

    fn run_to_end(m: &mut TestManager) -> Vec<Amount> {
        let mut now = T0;
        let mut payouts = Vec::new();
        while m.weeks_remaining() > 0 {
            now += PAY;
            match m.advance(&KEEPER, now).unwrap() {
                AdvanceOutcome::Paid { amount, .. } => payouts.push(amount),
                other => panic!("expected payout, got {other:?}"),
            }
            now += CHECK;
            m.advance(&KEEPER, now).unwrap();
        }
        payouts
    }

    #[test]
    fn full_schedule_drains_exactly() {
        let mut m = funded(48, 11_760);
        let payouts = run_to_end(&mut m);
        assert_eq!(payouts.len(), 48);
        assert_eq!(payouts.iter().sum::<Amount>(), 11_760);
        assert_eq!(m.last_payout_amount(), 10);
        assert_eq!(m.held_balance(), 0);
        assert_eq!(m.ledger().balance_of(&ASSET, &DESTINATION), 11_760);
    }

    #[test]
    fn first_payout_falls_below_opening_amount() {
        let mut m = funded(48, 11_760);
        let before = m.last_payout_amount();
        m.advance(&KEEPER, T0 + PAY).unwrap();
        assert!(m.last_payout_amount() < before);
    }

    #[test]
    fn deposit_mid_run_does_not_raise_payouts() {
        let mut m = funded(3, 60);
        m.advance(&KEEPER, T0 + PAY).unwrap();
        m.ledger_mut().mint(ASSET, MANAGER, 100).unwrap();
        let mut now = T0 + PAY;
        let mut payouts = vec![m.last_payout_amount()];
        while m.weeks_remaining() > 0 {
            now += CHECK;
            m.advance(&KEEPER, now).unwrap();
            if m.weeks_remaining() == 0 {
                break;
            }
            now += PAY;
            if let AdvanceOutcome::Paid { amount, .. } = m.advance(&KEEPER, now).unwrap() {
                payouts.push(amount);
            }
        }
        assert_eq!(payouts, vec![30, 29, 10]);
        // The surplus stays behind for a sweep.
        assert_eq!(m.held_balance(), 160 - 69);
    }

    #[test]
    fn deposit_before_first_payout_is_capped_by_opening_amount() {
        let mut m = funded(3, 60);
        assert_eq!(m.last_payout_amount(), 40);
        m.ledger_mut().mint(ASSET, MANAGER, 1_000).unwrap();
        assert_eq!(
            m.advance(&KEEPER, T0 + PAY).unwrap(),
            AdvanceOutcome::Paid {
                amount: 39,
                weeks_remaining: 3
            }
        );
    }

    #[test]
    fn exhausted_schedule_rejects_any_time() {
        let mut m = funded(2, 100);
        run_to_end(&mut m);
        assert_eq!(m.next_advance_at(), None);
        for later in [0, 1, PAY, 365 * 86_400] {
            assert_eq!(
                m.advance(&KEEPER, T0 + later + 10 * PAY),
                Err(RewardsError::ScheduleExhausted)
            );
        }
    }

    #[test]
    fn exhausted_schedule_ignores_new_deposit() {
        let mut m = funded(1, 10);
        run_to_end(&mut m);
        m.ledger_mut().mint(ASSET, MANAGER, 1_000).unwrap();
        assert_eq!(
            m.advance(&KEEPER, u64::MAX),
            Err(RewardsError::ScheduleExhausted)
        );
    }

    #[test]
    fn underfunded_payout_fails_without_state_change() {
        let mut m = funded(48, 100);
        let before = m.state().clone();
        let err = m.advance(&KEEPER, T0 + PAY).unwrap_err();
        assert!(matches!(err, RewardsError::InsufficientBalance { have: 100, .. }));
        assert_eq!(m.state(), &before);
    }

    #[test]
    fn ledger_rejection_surfaces_as_transfer_failed() {
        let mut m = funded(48, 11_760);
        m.ledger_mut().set_rejecting(true);
        let before = m.state().clone();
        assert!(matches!(
            m.advance(&KEEPER, T0 + PAY),
            Err(RewardsError::TransferFailed(_))
        ));
        assert_eq!(m.state(), &before);
        m.ledger_mut().set_rejecting(false);
        assert!(m.advance(&KEEPER, T0 + PAY).is_ok());
    }

    // --- reset_schedule ---

    #[test]
    fn reset_requires_exhaustion() {
        let mut m = funded(2, 100);
        assert_eq!(
            m.reset_schedule(&OWNER, 4, T0),
            Err(RewardsError::ScheduleActive { weeks_remaining: 2 })
        );
    }

    #[test]
    fn reset_requires_owner() {
        let mut m = funded(1, 10);
        run_to_end(&mut m);
        assert_eq!(
            m.reset_schedule(&KEEPER, 4, T0),
            Err(RewardsError::Unauthorized { caller: KEEPER })
        );
    }

    #[test]
    fn reset_rejects_zero_weeks() {
        let mut m = funded(1, 10);
        run_to_end(&mut m);
        assert!(matches!(
            m.reset_schedule(&OWNER, 0, T0),
            Err(RewardsError::InvalidSchedule(_))
        ));
    }

    #[test]
    fn reset_starts_a_new_run() {
        let mut m = funded(1, 10);
        run_to_end(&mut m);
        let restart = m.last_transition_time() + 1;
        m.reset_schedule(&OWNER, 3, restart).unwrap();
        assert_eq!(m.weeks_remaining(), 3);
        assert_eq!(m.phase(), Phase::AwaitingPayout);
        assert_eq!(m.last_payout_amount(), 0);
        assert_eq!(m.next_advance_at(), Some(restart + PAY));

        m.ledger_mut().mint(ASSET, MANAGER, 60).unwrap();
        assert_eq!(
            m.advance(&KEEPER, restart + PAY).unwrap(),
            AdvanceOutcome::Paid {
                amount: 30,
                weeks_remaining: 3
            }
        );
    }
}
