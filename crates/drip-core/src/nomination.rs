//! Two-step nomination: a commit step records a nominee, a later step
//! finalizes it.
//!
//! Shared by ownership transfer (finalized by the nominee itself) and the
//! external admin handoff (finalized by the owner acting as proxy).

use serde::{Deserialize, Serialize};

use crate::types::Address;

/// A pending nominee slot.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default,
    bincode::Encode, bincode::Decode,
)]
pub struct Nomination {
    nominee: Option<Address>,
}

impl Nomination {
    /// An empty slot.
    pub const fn none() -> Self {
        Self { nominee: None }
    }

    /// Record `nominee`, replacing any earlier nomination.
    pub fn nominate(&mut self, nominee: Address) {
        self.nominee = Some(nominee);
    }

    pub fn pending(&self) -> Option<Address> {
        self.nominee
    }

    pub fn is_pending(&self) -> bool {
        self.nominee.is_some()
    }

    /// Whether `candidate` is the current nominee.
    pub fn is(&self, candidate: &Address) -> bool {
        self.nominee.as_ref() == Some(candidate)
    }

    /// Finalize on behalf of the nominee: succeeds only when `caller` is the
    /// nominee, consuming the slot.
    pub fn accept(&mut self, caller: &Address) -> Option<Address> {
        if self.is(caller) { self.nominee.take() } else { None }
    }

    /// Finalize by proxy: hand out whoever is nominated, consuming the slot.
    pub fn take(&mut self) -> Option<Address> {
        self.nominee.take()
    }

    pub fn clear(&mut self) {
        self.nominee = None;
    }
}
