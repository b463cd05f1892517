//! # drip-core
//! Foundation types and traits for the Drip reward distributor.
//!
//! - [`types`]: identities, amounts, the epoch [`Phase`](types::Phase)
//! - [`state`]: the single persisted [`LedgerState`](state::LedgerState) record
//! - [`traits`]: collaborator contracts (token ledger, fee distributor, payout curve)
//! - [`nomination`]: the two-step nominate/accept component

pub mod constants;
pub mod error;
pub mod nomination;
pub mod state;
pub mod traits;
pub mod types;
