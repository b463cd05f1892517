//! The single persisted record shared by every manager component.
//!
//! Encoded with `bincode::config::standard()`. Fields are public so the
//! manager can mutate them; the manager only ever hands out `&LedgerState`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CHECKPOINT_GATE_SECS, DEFAULT_PAYOUT_GATE_SECS};
use crate::error::StateError;
use crate::nomination::Nomination;
use crate::types::{Address, Amount, AssetId, Phase, Timestamp};

/// Timing and terminal amount of a payout schedule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct ScheduleParams {
    /// Seconds that must pass after a checkpoint (or deployment) before a payout.
    pub payout_gate: u64,
    /// Seconds that must pass after a payout before the checkpoint.
    pub checkpoint_gate: u64,
    /// Exact amount of the final payout, in base units.
    pub floor: Amount,
}

impl ScheduleParams {
    /// Reference gates with the given floor.
    pub fn with_floor(floor: Amount) -> Self {
        Self {
            payout_gate: DEFAULT_PAYOUT_GATE_SECS,
            checkpoint_gate: DEFAULT_CHECKPOINT_GATE_SECS,
            floor,
        }
    }

    /// Gate guarding the transition out of `phase`.
    pub fn gate(&self, phase: Phase) -> u64 {
        match phase {
            Phase::AwaitingPayout => self.payout_gate,
            Phase::AwaitingCheckpoint => self.checkpoint_gate,
        }
    }
}

/// Persistent manager state.
///
/// Created once at deployment and mutated in place afterwards. A schedule is
/// retired by reaching `weeks_remaining == 0`.
#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, bincode::Encode, bincode::Decode,
)]
pub struct LedgerState {
    /// Identity with full control.
    pub owner: Address,
    /// Nominee of an in-flight ownership transfer.
    pub ownership: Nomination,
    /// Managers allowed to drive payouts besides the owner.
    pub authorized: BTreeSet<Address>,
    /// Half-cycle the next `advance` executes.
    pub phase: Phase,
    /// Time of the last successful payout or checkpoint (deployment time initially).
    pub last_transition_time: Timestamp,
    /// Amount released by the most recent payout; 0 before the first one.
    pub last_payout_amount: Amount,
    /// Payout cycles left, counting the current one until its checkpoint.
    pub weeks_remaining: u32,
    /// Destination committed for the external admin handoff.
    pub pending_admin_destination: Nomination,
    /// Asset released by the schedule.
    pub reward_asset: AssetId,
    /// Recipient of every weekly payout.
    pub destination: Address,
    /// Gates and floor.
    pub schedule: ScheduleParams,
}

impl LedgerState {
    /// Fresh state at deployment time `now`.
    pub fn new(
        owner: Address,
        reward_asset: AssetId,
        destination: Address,
        schedule: ScheduleParams,
        weeks: u32,
        now: Timestamp,
    ) -> Self {
        Self {
            owner,
            ownership: Nomination::none(),
            authorized: BTreeSet::new(),
            phase: Phase::AwaitingPayout,
            last_transition_time: now,
            last_payout_amount: 0,
            weeks_remaining: weeks,
            pending_admin_destination: Nomination::none(),
            reward_asset,
            destination,
            schedule,
        }
    }

    pub fn is_owner(&self, caller: &Address) -> bool {
        self.owner == *caller
    }

    pub fn is_authorized(&self, caller: &Address) -> bool {
        self.authorized.contains(caller)
    }

    /// Owner or authorized manager.
    pub fn can_advance(&self, caller: &Address) -> bool {
        self.is_owner(caller) || self.is_authorized(caller)
    }

    pub fn is_exhausted(&self) -> bool {
        self.weeks_remaining == 0 && self.phase == Phase::AwaitingPayout
    }

    /// Earliest time the next transition may run.
    pub fn ready_at(&self) -> Timestamp {
        self.last_transition_time
            .saturating_add(self.schedule.gate(self.phase))
    }

    /// Encode the record for persistence.
    pub fn to_bytes(&self) -> Result<Vec<u8>, StateError> {
        bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| StateError::Encode(e.to_string()))
    }

    /// Decode and validate a persisted record.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StateError> {
        let (state, read): (Self, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())
                .map_err(|e| StateError::Decode(e.to_string()))?;
        if read != bytes.len() {
            return Err(StateError::Decode(format!(
                "{} trailing bytes",
                bytes.len() - read
            )));
        }
        state.validate()?;
        Ok(state)
    }

    /// Structural checks on a record.
    pub fn validate(&self) -> Result<(), StateError> {
        if self.owner.is_zero() {
            return Err(StateError::Corrupted("zero owner".into()));
        }
        if self.schedule.payout_gate == 0 || self.schedule.checkpoint_gate == 0 {
            return Err(StateError::Corrupted("zero gate".into()));
        }
        if self.schedule.floor == 0 {
            return Err(StateError::Corrupted("zero floor".into()));
        }
        // A checkpoint always closes a week that was paid out.
        if self.phase == Phase::AwaitingCheckpoint && self.weeks_remaining == 0 {
            return Err(StateError::Corrupted(
                "awaiting checkpoint with no weeks remaining".into(),
            ));
        }
        Ok(())
    }
}
