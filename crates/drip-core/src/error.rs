//! Error types for the Drip reward distributor.
//!
//! Every failing operation aborts before mutating any state, so each variant
//! below implies "nothing changed".
use thiserror::Error;

use crate::types::{Address, Amount, Timestamp};

/// Rejections raised by the token ledger collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("insufficient balance: have {have}, need {need}")] InsufficientBalance { have: Amount, need: Amount },
    #[error("transfer rejected: {0}")] Rejected(String),
}

/// Rejections raised by the external fee distributor during admin handoff.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandoffError {
    #[error("caller {0} is not the fee distributor admin")] NotAdmin(Address),
    #[error("no admin nomination is pending")] NoPendingAdmin,
    #[error("caller {0} is not the nominated admin")] NotNominee(Address),
}

/// Failures of the payout curve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule exhausted")] Exhausted,
    #[error("schedule underfunded: have {have}, need {need}")] Underfunded { have: Amount, need: Amount },
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

/// Failures while persisting or restoring the ledger record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("encode: {0}")] Encode(String),
    #[error("decode: {0}")] Decode(String),
    #[error("corrupted ledger state: {0}")] Corrupted(String),
}

/// Errors surfaced to callers of the reward manager.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewardsError {
    /// Caller lacks the role the operation requires.
    #[error("unauthorized caller: {caller}")]
    Unauthorized { caller: Address },

    /// The current half-cycle gate has not elapsed yet. Safe to retry later.
    #[error("epoch not ready: now {now}, ready at {ready_at}")]
    EpochNotReady { now: Timestamp, ready_at: Timestamp },

    /// No weeks remain in the schedule.
    #[error("schedule exhausted")]
    ScheduleExhausted,

    /// The schedule still has weeks left and cannot be re-armed.
    #[error("schedule still active: {weeks_remaining} weeks remaining")]
    ScheduleActive { weeks_remaining: u32 },

    /// Rejected schedule or configuration parameters.
    #[error("invalid schedule: {0}")]
    InvalidSchedule(String),

    /// The manager does not hold enough of the asset.
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: Amount, need: Amount },

    /// The token ledger rejected an outbound transfer.
    #[error("transfer failed: {0}")]
    TransferFailed(#[source] LedgerError),

    /// The fee distributor rejected a handoff step.
    #[error("admin handoff rejected: {0}")]
    AdminHandoffRejected(#[source] HandoffError),

    /// `apply` was called with no committed destination.
    #[error("no pending admin transfer")]
    NoPendingAdminTransfer,

    /// The payout curve overflowed.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

impl From<ScheduleError> for RewardsError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::Exhausted => Self::ScheduleExhausted,
            ScheduleError::Underfunded { have, need } => Self::InsufficientBalance { have, need },
            ScheduleError::ArithmeticOverflow => Self::ArithmeticOverflow,
        }
    }
}

impl From<LedgerError> for RewardsError {
    fn from(err: LedgerError) -> Self {
        Self::TransferFailed(err)
    }
}

impl From<HandoffError> for RewardsError {
    fn from(err: HandoffError) -> Self {
        Self::AdminHandoffRejected(err)
    }
}
