//! Admin handoff proxy for the external fee distributor.
//!
//! The manager can hold admin rights over the fee distributor on the owner's
//! behalf. Rights come in through [`accept_incoming_admin`] once the
//! distributor has nominated the manager, and go back out in two steps:
//! [`commit_external_admin_transfer`] proposes a destination, then
//! [`apply_external_admin_transfer`] finalizes it.
//!
//! [`accept_incoming_admin`]: RewardsManager::accept_incoming_admin
//! [`commit_external_admin_transfer`]: RewardsManager::commit_external_admin_transfer
//! [`apply_external_admin_transfer`]: RewardsManager::apply_external_admin_transfer

use drip_core::error::{HandoffError, RewardsError};
use drip_core::traits::{AssetLedger, FeeDistributor, PayoutCurve};
use drip_core::types::Address;
use tracing::{info, warn};

use crate::manager::RewardsManager;

impl<L: AssetLedger, F: FeeDistributor, C: PayoutCurve> RewardsManager<L, F, C> {
    /// Become the fee distributor's admin. The distributor must already have
    /// nominated this manager. Owner only.
    pub fn accept_incoming_admin(&mut self, caller: &Address) -> Result<(), RewardsError> {
        self.require_owner(caller, "accept_incoming_admin")?;
        // As current admin, accept_admin would apply an outbound proposal.
        match self.distributor.pending_admin() {
            Some(nominee) if nominee == self.address => {}
            Some(_) => {
                return Err(RewardsError::AdminHandoffRejected(HandoffError::NotNominee(
                    self.address,
                )));
            }
            None => return Err(RewardsError::AdminHandoffRejected(HandoffError::NoPendingAdmin)),
        }
        if let Err(e) = self.distributor.accept_admin(&self.address) {
            warn!("fee distributor rejected incoming admin: {e}");
            return Err(RewardsError::AdminHandoffRejected(e));
        }
        info!(address = %self.address, "accepted fee distributor admin");
        Ok(())
    }

    /// Propose `destination` as the fee distributor's next admin. Owner only.
    ///
    /// Replaces any earlier uncommitted destination.
    pub fn commit_external_admin_transfer(
        &mut self,
        caller: &Address,
        destination: Address,
    ) -> Result<(), RewardsError> {
        self.require_owner(caller, "commit_external_admin_transfer")?;
        if let Err(e) = self.distributor.propose_admin(&self.address, &destination) {
            warn!(%destination, "fee distributor rejected admin proposal: {e}");
            return Err(RewardsError::AdminHandoffRejected(e));
        }
        self.state.pending_admin_destination.nominate(destination);
        info!(%destination, "committed fee distributor admin transfer");
        Ok(())
    }

    /// Finalize the committed transfer and clear it. Owner only.
    ///
    /// Returns the new fee distributor admin.
    pub fn apply_external_admin_transfer(
        &mut self,
        caller: &Address,
    ) -> Result<Address, RewardsError> {
        self.require_owner(caller, "apply_external_admin_transfer")?;
        let Some(destination) = self.state.pending_admin_destination.pending() else {
            return Err(RewardsError::NoPendingAdminTransfer);
        };
        if self.distributor.current_admin() == destination {
            // The nominee accepted on the distributor directly.
            self.state.pending_admin_destination.clear();
            info!(%destination, "fee distributor admin transfer already completed");
            return Ok(destination);
        }
        match self.distributor.pending_admin() {
            Some(nominee) if nominee == destination => {}
            Some(_) => {
                return Err(RewardsError::AdminHandoffRejected(HandoffError::NotNominee(
                    destination,
                )));
            }
            None => return Err(RewardsError::AdminHandoffRejected(HandoffError::NoPendingAdmin)),
        }
        if let Err(e) = self.distributor.accept_admin(&self.address) {
            warn!(%destination, "fee distributor rejected admin transfer: {e}");
            return Err(RewardsError::AdminHandoffRejected(e));
        }
        self.state.pending_admin_destination.clear();
        info!(%destination, "applied fee distributor admin transfer");
        Ok(destination)
    }
}
