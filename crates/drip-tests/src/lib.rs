//! Cross-crate test suite for the Drip reward distributor.
//!
//! Scenario tests replay whole schedules through the public manager API;
//! property tests check the payout and authorization invariants under
//! randomized inputs.

pub mod helpers;
