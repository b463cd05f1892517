//! The reward manager: one [`LedgerState`] plus the collaborators it drives.
//!
//! Operations are split across modules by component, each an `impl` block on
//! [`RewardsManager`]:
//! - [`scheduler`](crate::scheduler): `advance`, `reset_schedule`
//! - [`registry`](crate::registry): authorization and ownership
//! - [`sweep`](crate::sweep): emergency withdrawal
//! - [`handoff`](crate::handoff): external admin handoff
//!
//! Every operation takes `&mut self` and runs every check before its first
//! mutation, so a failed call leaves the state exactly as it was.

use std::collections::btree_set;

use drip_core::error::{RewardsError, StateError};
use drip_core::state::{LedgerState, ScheduleParams};
use drip_core::traits::{AssetLedger, FeeDistributor, PayoutCurve};
use drip_core::types::{Address, Amount, AssetId, Phase, Timestamp};
use drip_schedule::LinearRamp;
use tracing::{debug, info};

/// Deployment parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// The manager's own identity on the ledger and the fee distributor.
    pub address: Address,
    pub owner: Address,
    pub reward_asset: AssetId,
    /// Recipient of the weekly payouts.
    pub destination: Address,
    /// Schedule length in weeks.
    pub weeks: u32,
    pub schedule: ScheduleParams,
}

impl Deployment {
    fn validate(&self) -> Result<(), RewardsError> {
        let invalid = |msg: &str| Err(RewardsError::InvalidSchedule(msg.to_string()));
        if self.address.is_zero() {
            return invalid("zero manager address");
        }
        if self.owner.is_zero() {
            return invalid("zero owner");
        }
        if self.weeks == 0 {
            return invalid("schedule must span at least one week");
        }
        if self.schedule.payout_gate == 0 || self.schedule.checkpoint_gate == 0 {
            return invalid("gates must be non-zero");
        }
        if self.schedule.floor == 0 {
            return invalid("floor must be non-zero");
        }
        Ok(())
    }
}

/// Time-gated weekly reward distributor.
///
/// Generic over the token ledger `L`, the external fee distributor `F`, and
/// the payout curve `C`.
#[derive(Debug)]
pub struct RewardsManager<L, F, C = LinearRamp> {
    pub(crate) address: Address,
    pub(crate) state: LedgerState,
    pub(crate) ledger: L,
    pub(crate) distributor: F,
    pub(crate) curve: C,
}

impl<L: AssetLedger, F: FeeDistributor> RewardsManager<L, F, LinearRamp> {
    /// Deploy with the production payout curve.
    pub fn deploy(
        deployment: Deployment,
        ledger: L,
        distributor: F,
        now: Timestamp,
    ) -> Result<Self, RewardsError> {
        Self::deploy_with_curve(deployment, ledger, distributor, LinearRamp::new(), now)
    }
}

impl<L: AssetLedger, F: FeeDistributor, C: PayoutCurve> RewardsManager<L, F, C> {
    /// Deploy with an explicit payout curve.
    pub fn deploy_with_curve(
        deployment: Deployment,
        ledger: L,
        distributor: F,
        curve: C,
        now: Timestamp,
    ) -> Result<Self, RewardsError> {
        deployment.validate()?;
        let state = LedgerState::new(
            deployment.owner,
            deployment.reward_asset,
            deployment.destination,
            deployment.schedule,
            deployment.weeks,
            now,
        );
        info!(
            address = %deployment.address,
            owner = %deployment.owner,
            weeks = deployment.weeks,
            now,
            "deployed rewards manager"
        );
        let mut manager = Self {
            address: deployment.address,
            state,
            ledger,
            distributor,
            curve,
        };
        manager.state.last_payout_amount = manager.opening_amount(deployment.weeks);
        Ok(manager)
    }

    /// Rebuild a manager from a [`snapshot`](Self::snapshot).
    pub fn restore(
        address: Address,
        bytes: &[u8],
        ledger: L,
        distributor: F,
        curve: C,
    ) -> Result<Self, StateError> {
        let state = LedgerState::from_bytes(bytes)?;
        debug!(%address, weeks_remaining = state.weeks_remaining, "restored ledger state");
        Ok(Self {
            address,
            state,
            ledger,
            distributor,
            curve,
        })
    }

    /// Encoded ledger state.
    pub fn snapshot(&self) -> Result<Vec<u8>, StateError> {
        self.state.to_bytes()
    }

    /// Starting `last_payout_amount` for a run of `weeks` funded by the
    /// current balance; 0 while the balance cannot fund the run.
    pub(crate) fn opening_amount(&self, weeks: u32) -> Amount {
        let held = self.held_balance();
        match self
            .curve
            .opening_amount(weeks, held, self.state.schedule.floor)
        {
            Ok(amount) => amount,
            Err(e) => {
                debug!(weeks, %held, "run not funded yet: {e}");
                0
            }
        }
    }

    pub(crate) fn require_owner(&self, caller: &Address, op: &str) -> Result<(), RewardsError> {
        if self.state.is_owner(caller) {
            return Ok(());
        }
        debug!(%caller, op, "rejected: caller is not the owner");
        Err(RewardsError::Unauthorized { caller: *caller })
    }

    // ------------------------------------------------------------------
    // Read-only accessors
    // ------------------------------------------------------------------

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn last_payout_amount(&self) -> Amount {
        self.state.last_payout_amount
    }

    pub fn last_transition_time(&self) -> Timestamp {
        self.state.last_transition_time
    }

    pub fn weeks_remaining(&self) -> u32 {
        self.state.weeks_remaining
    }

    pub fn owner(&self) -> Address {
        self.state.owner
    }

    pub fn pending_owner(&self) -> Option<Address> {
        self.state.ownership.pending()
    }

    pub fn is_authorized(&self, who: &Address) -> bool {
        self.state.is_authorized(who)
    }

    /// Owner or authorized manager.
    pub fn can_advance(&self, who: &Address) -> bool {
        self.state.can_advance(who)
    }

    pub fn authorized(&self) -> btree_set::Iter<'_, Address> {
        self.state.authorized.iter()
    }

    pub fn pending_admin_destination(&self) -> Option<Address> {
        self.state.pending_admin_destination.pending()
    }

    /// Earliest time the next `advance` can succeed; `None` once exhausted.
    pub fn next_advance_at(&self) -> Option<Timestamp> {
        if self.state.is_exhausted() {
            None
        } else {
            Some(self.state.ready_at())
        }
    }

    /// Balance of the reward asset held by the manager.
    pub fn held_balance(&self) -> Amount {
        self.ledger
            .balance_of(&self.state.reward_asset, &self.address)
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Mutable access to the ledger collaborator, e.g. to deposit funds.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn distributor(&self) -> &F {
        &self.distributor
    }

    pub fn distributor_mut(&mut self) -> &mut F {
        &mut self.distributor
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }
}
