//! # drip-manager: time-gated weekly reward manager.
//!
//! [`RewardsManager`] holds a deposit of one reward asset and releases it in
//! a decaying weekly schedule. Each week is two gated half-cycles: a payout
//! to the destination, then a checkpoint that rolls the epoch.
//!
//! The token ledger and the external fee distributor are trait
//! collaborators; [`memory`] has in-process implementations of both.

pub mod config;
pub mod handoff;
pub mod manager;
pub mod memory;
pub mod registry;
pub mod scheduler;
pub mod sweep;

pub use config::{ConfigError, ManagerConfig};
pub use manager::{Deployment, RewardsManager};
pub use memory::{MemoryFeeDistributor, MemoryLedger};
pub use scheduler::AdvanceOutcome;
