//! Shared fixtures for scenario and property tests.

use drip_core::error::RewardsError;
use drip_core::state::ScheduleParams;
use drip_core::types::{Address, Amount, AssetId, Timestamp};
use drip_manager::{AdvanceOutcome, Deployment, MemoryFeeDistributor, MemoryLedger, RewardsManager};

pub const MANAGER: Address = Address::repeat_byte(0x4D);
pub const OWNER: Address = Address::repeat_byte(0x01);
pub const KEEPER: Address = Address::repeat_byte(0x02);
pub const STRANGER: Address = Address::repeat_byte(0x03);
pub const DESTINATION: Address = Address::repeat_byte(0xDD);
pub const FEE_ADMIN: Address = Address::repeat_byte(0xFE);
pub const REWARD_ASSET: AssetId = AssetId::repeat_byte(0xAA);
pub const T0: Timestamp = 1_700_000_000;

pub type Manager = RewardsManager<MemoryLedger, MemoryFeeDistributor>;

pub fn deployment(weeks: u32, floor: Amount) -> Deployment {
    Deployment {
        address: MANAGER,
        owner: OWNER,
        reward_asset: REWARD_ASSET,
        destination: DESTINATION,
        weeks,
        schedule: ScheduleParams::with_floor(floor),
    }
}

/// Manager holding `deposit`, with KEEPER authorized and FEE_ADMIN running
/// the fee distributor.
pub fn funded(weeks: u32, floor: Amount, deposit: Amount) -> Manager {
    let mut ledger = MemoryLedger::new();
    ledger.mint(REWARD_ASSET, MANAGER, deposit).unwrap();
    let mut m = RewardsManager::deploy(
        deployment(weeks, floor),
        ledger,
        MemoryFeeDistributor::new(FEE_ADMIN),
        T0,
    )
    .unwrap();
    m.set_authorized(&OWNER, KEEPER, true).unwrap();
    m
}

/// Advance at the earliest legal time until the schedule is exhausted or a
/// call fails. Returns every payout in order.
pub fn run_to_end(m: &mut Manager) -> Result<Vec<Amount>, RewardsError> {
    let mut payouts = Vec::new();
    while let Some(at) = m.next_advance_at() {
        if let AdvanceOutcome::Paid { amount, .. } = m.advance(&KEEPER, at)? {
            payouts.push(amount);
        }
    }
    Ok(payouts)
}
