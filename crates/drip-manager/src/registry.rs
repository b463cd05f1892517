//! Authorization registry: the owner, the authorized managers, and two-step
//! ownership transfer.

use drip_core::error::RewardsError;
use drip_core::traits::{AssetLedger, FeeDistributor, PayoutCurve};
use drip_core::types::Address;
use tracing::{debug, info};

use crate::manager::RewardsManager;

impl<L: AssetLedger, F: FeeDistributor, C: PayoutCurve> RewardsManager<L, F, C> {
    /// Grant or revoke `target`'s right to drive payouts. Owner only.
    ///
    /// Idempotent; returns whether membership changed.
    pub fn set_authorized(
        &mut self,
        caller: &Address,
        target: Address,
        enabled: bool,
    ) -> Result<bool, RewardsError> {
        self.require_owner(caller, "set_authorized")?;
        let changed = if enabled {
            self.state.authorized.insert(target)
        } else {
            self.state.authorized.remove(&target)
        };
        if changed {
            info!(%target, enabled, "authorization updated");
        }
        Ok(changed)
    }

    /// Nominate `new_owner`. The current owner keeps every right until the
    /// nominee accepts; a later nomination replaces this one.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), RewardsError> {
        self.require_owner(caller, "transfer_ownership")?;
        self.state.ownership.nominate(new_owner);
        info!(owner = %self.state.owner, nominee = %new_owner, "ownership transfer proposed");
        Ok(())
    }

    /// Complete a pending ownership transfer. Callable only by the nominee.
    pub fn accept_ownership(&mut self, caller: &Address) -> Result<(), RewardsError> {
        let Some(new_owner) = self.state.ownership.accept(caller) else {
            debug!(%caller, "rejected accept_ownership: caller is not the nominee");
            return Err(RewardsError::Unauthorized { caller: *caller });
        };
        let previous = std::mem::replace(&mut self.state.owner, new_owner);
        info!(%previous, owner = %new_owner, "ownership transferred");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::tests::*;

    #[test]
    fn owner_authorizes_keeper() {
        let mut m = funded(4, 100);
        assert!(m.set_authorized(&OWNER, STRANGER, true).unwrap());
        assert!(m.is_authorized(&STRANGER));
    }

    #[test]
    fn authorization_is_idempotent() {
        let mut m = funded(4, 100);
        assert!(!m.set_authorized(&OWNER, KEEPER, true).unwrap());
        assert!(!m.set_authorized(&OWNER, KEEPER, true).unwrap());
        assert_eq!(m.authorized().count(), 1);
        assert!(m.is_authorized(&KEEPER));
    }

    #[test]
    fn removing_unknown_target_is_noop() {
        let mut m = funded(4, 100);
        assert!(!m.set_authorized(&OWNER, STRANGER, false).unwrap());
        assert!(m.set_authorized(&OWNER, KEEPER, false).unwrap());
        assert_eq!(m.authorized().count(), 0);
    }

    #[test]
    fn keeper_cannot_authorize() {
        let mut m = funded(4, 100);
        let before = m.state().clone();
        assert_eq!(
            m.set_authorized(&KEEPER, STRANGER, true),
            Err(RewardsError::Unauthorized { caller: KEEPER })
        );
        assert_eq!(m.state(), &before);
    }

    #[test]
    fn ownership_transfer_is_two_step() {
        let mut m = funded(4, 100);
        m.transfer_ownership(&OWNER, STRANGER).unwrap();
        assert_eq!(m.owner(), OWNER);
        assert_eq!(m.pending_owner(), Some(STRANGER));

        // Old owner keeps rights until acceptance.
        assert!(m.set_authorized(&OWNER, DESTINATION, true).is_ok());
        assert!(m.set_authorized(&STRANGER, DESTINATION, false).is_err());

        m.accept_ownership(&STRANGER).unwrap();
        assert_eq!(m.owner(), STRANGER);
        assert_eq!(m.pending_owner(), None);
        assert!(m.set_authorized(&OWNER, DESTINATION, false).is_err());
        assert!(m.set_authorized(&STRANGER, DESTINATION, false).is_ok());
    }

    #[test]
    fn only_nominee_accepts() {
        let mut m = funded(4, 100);
        m.transfer_ownership(&OWNER, STRANGER).unwrap();
        assert_eq!(
            m.accept_ownership(&KEEPER),
            Err(RewardsError::Unauthorized { caller: KEEPER })
        );
        assert_eq!(m.pending_owner(), Some(STRANGER));
    }

    #[test]
    fn accept_without_nomination_is_unauthorized() {
        let mut m = funded(4, 100);
        assert!(matches!(
            m.accept_ownership(&OWNER),
            Err(RewardsError::Unauthorized { .. })
        ));
    }

    #[test]
    fn non_owner_cannot_nominate() {
        let mut m = funded(4, 100);
        assert!(m.transfer_ownership(&KEEPER, KEEPER).is_err());
        assert_eq!(m.pending_owner(), None);
    }

    #[test]
    fn renomination_replaces_nominee() {
        let mut m = funded(4, 100);
        m.transfer_ownership(&OWNER, STRANGER).unwrap();
        m.transfer_ownership(&OWNER, KEEPER).unwrap();
        assert!(m.accept_ownership(&STRANGER).is_err());
        m.accept_ownership(&KEEPER).unwrap();
        assert_eq!(m.owner(), KEEPER);
    }
}
