//! Trait interfaces for the Drip reward distributor.
//!
//! These traits define the contracts between the manager and the systems it
//! talks to:
//! - [`AssetLedger`]: the fungible token ledger holding the manager's funds
//! - [`FeeDistributor`]: the externally-owned system whose admin rights are
//!   handed in and back out
//! - [`PayoutCurve`]: the decay math that sizes each weekly payout
//!   (drip-schedule implements)

use crate::error::{HandoffError, LedgerError, ScheduleError};
use crate::types::{Address, Amount, AssetId};

/// A multi-asset fungible token ledger.
///
/// The manager only ever moves funds it holds itself, so `from` is always the
/// manager's own address when called from this workspace.
pub trait AssetLedger: Send + Sync {
    /// Balance of `holder` in `asset`. Unknown holders have a zero balance.
    fn balance_of(&self, asset: &AssetId, holder: &Address) -> Amount;

    /// Move `amount` of `asset` from `from` to `to`.
    ///
    /// Must either move the full amount or fail without changing balances.
    fn transfer(
        &mut self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}

/// The admin surface of the external fee-distribution system.
///
/// Admin changes follow a propose/accept protocol: the current admin proposes
/// a nominee, then the transfer is finalized by an `accept_admin` call from
/// either the nominee or the current admin.
pub trait FeeDistributor: Send + Sync {
    /// The current administrator.
    fn current_admin(&self) -> Address;

    /// The nominated next administrator, if any.
    fn pending_admin(&self) -> Option<Address>;

    /// Nominate `nominee`. Only the current admin may call this.
    fn propose_admin(&mut self, caller: &Address, nominee: &Address) -> Result<(), HandoffError>;

    /// Finalize the pending nomination.
    fn accept_admin(&mut self, caller: &Address) -> Result<(), HandoffError>;
}

/// Sizes weekly payouts for a funded schedule.
///
/// Implementations must satisfy, over one funded schedule:
/// - `payout_amount(1, _, floor) == floor`
/// - payouts strictly decrease as `weeks_remaining` counts down
/// - the payouts sum exactly to the balance held before the first one
pub trait PayoutCurve: Send + Sync {
    /// Amount to release this week given the weeks left (including this one)
    /// and the balance currently held.
    fn payout_amount(
        &self,
        weeks_remaining: u32,
        held: Amount,
        floor: Amount,
    ) -> Result<Amount, ScheduleError>;

    /// Smallest balance that funds `weeks` payouts ending at `floor`.
    fn minimum_funding(&self, weeks: u32, floor: Amount) -> Result<Amount, ScheduleError>;

    /// Value `last_payout_amount` starts a run at: strictly above the first
    /// payout. Defaults to the first payout plus one base unit.
    fn opening_amount(
        &self,
        weeks: u32,
        held: Amount,
        floor: Amount,
    ) -> Result<Amount, ScheduleError> {
        self.payout_amount(weeks, held, floor)?
            .checked_add(1)
            .ok_or(ScheduleError::ArithmeticOverflow)
    }

    /// Every payout a deposit would produce, first week first.
    ///
    /// Default implementation replays [`payout_amount`](Self::payout_amount)
    /// against a shrinking balance.
    fn project(
        &self,
        weeks: u32,
        deposit: Amount,
        floor: Amount,
    ) -> Result<Vec<Amount>, ScheduleError> {
        let mut held = deposit;
        let mut payouts = Vec::with_capacity(weeks as usize);
        for remaining in (1..=weeks).rev() {
            let amount = self.payout_amount(remaining, held, floor)?;
            held = held
                .checked_sub(amount)
                .ok_or(ScheduleError::ArithmeticOverflow)?;
            payouts.push(amount);
        }
        Ok(payouts)
    }
}
