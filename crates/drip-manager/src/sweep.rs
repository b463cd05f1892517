//! Treasury sweep: owner-only withdrawal of any asset the manager holds.
//!
//! Independent of the payout schedule, so stuck or mistakenly sent funds can
//! always be recovered.

use drip_core::error::RewardsError;
use drip_core::traits::{AssetLedger, FeeDistributor, PayoutCurve};
use drip_core::types::{Address, Amount, AssetId};
use tracing::{info, warn};

use crate::manager::RewardsManager;

impl<L: AssetLedger, F: FeeDistributor, C: PayoutCurve> RewardsManager<L, F, C> {
    /// Send `amount` of `asset` to the owner.
    pub fn sweep(
        &mut self,
        caller: &Address,
        asset: AssetId,
        amount: Amount,
    ) -> Result<(), RewardsError> {
        self.require_owner(caller, "sweep")?;
        let have = self.ledger.balance_of(&asset, &self.address);
        if have < amount {
            return Err(RewardsError::InsufficientBalance { have, need: amount });
        }
        let owner = self.state.owner;
        if let Err(e) = self.ledger.transfer(&asset, &self.address, &owner, amount) {
            warn!(%asset, %amount, "sweep transfer failed: {e}");
            return Err(RewardsError::TransferFailed(e));
        }
        info!(%asset, %amount, %owner, "swept funds to owner");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::tests::*;
    use drip_core::constants::DEFAULT_PAYOUT_GATE_SECS;

    const OTHER: AssetId = AssetId::repeat_byte(0xBB);

    #[test]
    fn owner_sweeps_unrelated_asset() {
        let mut m = funded(4, 100);
        m.ledger_mut().mint(OTHER, MANAGER, 55).unwrap();
        m.sweep(&OWNER, OTHER, 55).unwrap();
        assert_eq!(m.ledger().balance_of(&OTHER, &MANAGER), 0);
        assert_eq!(m.ledger().balance_of(&OTHER, &OWNER), 55);
        assert_eq!(m.held_balance(), 100);
    }

    #[test]
    fn owner_sweeps_reward_asset_mid_schedule() {
        let mut m = funded(4, 100);
        m.advance(&KEEPER, T0 + DEFAULT_PAYOUT_GATE_SECS).unwrap();
        let held = m.held_balance();
        m.sweep(&OWNER, ASSET, held).unwrap();
        assert_eq!(m.held_balance(), 0);
        // Sweeping does not touch the schedule.
        assert_eq!(m.weeks_remaining(), 4);
    }

    #[test]
    fn keeper_cannot_sweep() {
        let mut m = funded(4, 100);
        assert_eq!(
            m.sweep(&KEEPER, ASSET, 100),
            Err(RewardsError::Unauthorized { caller: KEEPER })
        );
        assert_eq!(m.held_balance(), 100);
    }

    #[test]
    fn sweep_more_than_held() {
        let mut m = funded(4, 100);
        assert_eq!(
            m.sweep(&OWNER, ASSET, 101),
            Err(RewardsError::InsufficientBalance { have: 100, need: 101 })
        );
        assert_eq!(m.held_balance(), 100);
    }

    #[test]
    fn sweep_zero_is_allowed() {
        let mut m = funded(4, 100);
        assert!(m.sweep(&OWNER, OTHER, 0).is_ok());
    }

    #[test]
    fn rejected_sweep_keeps_balance() {
        let mut m = funded(4, 100);
        m.ledger_mut().set_rejecting(true);
        assert!(matches!(
            m.sweep(&OWNER, ASSET, 50),
            Err(RewardsError::TransferFailed(_))
        ));
        assert_eq!(m.held_balance(), 100);
    }
}
