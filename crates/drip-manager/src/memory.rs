//! In-memory collaborators for tests, benchmarks and the simulator.

use std::collections::HashMap;

use drip_core::error::{HandoffError, LedgerError};
use drip_core::traits::{AssetLedger, FeeDistributor};
use drip_core::types::{Address, Amount, AssetId};

/// Multi-asset balance table.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    balances: HashMap<(AssetId, Address), Amount>,
    rejecting: bool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of `asset` to `holder` out of thin air.
    pub fn mint(
        &mut self,
        asset: AssetId,
        holder: Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let balance = self.balances.entry((asset, holder)).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Rejected("balance overflow".into()))?;
        Ok(())
    }

    /// When set, every transfer fails with [`LedgerError::Rejected`].
    pub fn set_rejecting(&mut self, rejecting: bool) {
        self.rejecting = rejecting;
    }

    /// Sum of all balances of `asset`.
    pub fn total_supply(&self, asset: &AssetId) -> Amount {
        self.balances
            .iter()
            .filter(|((a, _), _)| a == asset)
            .map(|(_, v)| *v)
            .fold(0, Amount::saturating_add)
    }
}

impl AssetLedger for MemoryLedger {
    fn balance_of(&self, asset: &AssetId, holder: &Address) -> Amount {
        self.balances.get(&(*asset, *holder)).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        asset: &AssetId,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        if self.rejecting {
            return Err(LedgerError::Rejected("ledger is rejecting transfers".into()));
        }
        let have = self.balance_of(asset, from);
        if have < amount {
            return Err(LedgerError::InsufficientBalance { have, need: amount });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(asset, to)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Rejected("balance overflow".into()))?;
        self.balances.insert((*asset, *from), have - amount);
        self.balances.insert((*asset, *to), credited);
        Ok(())
    }
}

/// Fee distributor admin slot with propose/accept semantics.
///
/// `accept_admin` succeeds for the nominee itself or for the current admin
/// applying its own proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryFeeDistributor {
    admin: Address,
    future_admin: Option<Address>,
}

impl MemoryFeeDistributor {
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            future_admin: None,
        }
    }
}

impl FeeDistributor for MemoryFeeDistributor {
    fn current_admin(&self) -> Address {
        self.admin
    }

    fn pending_admin(&self) -> Option<Address> {
        self.future_admin
    }

    fn propose_admin(&mut self, caller: &Address, nominee: &Address) -> Result<(), HandoffError> {
        if *caller != self.admin {
            return Err(HandoffError::NotAdmin(*caller));
        }
        self.future_admin = Some(*nominee);
        Ok(())
    }

    fn accept_admin(&mut self, caller: &Address) -> Result<(), HandoffError> {
        let Some(nominee) = self.future_admin else {
            return Err(HandoffError::NoPendingAdmin);
        };
        if *caller != nominee && *caller != self.admin {
            return Err(HandoffError::NotNominee(*caller));
        }
        self.admin = nominee;
        self.future_admin = None;
        Ok(())
    }
}
