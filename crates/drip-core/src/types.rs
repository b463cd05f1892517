//! Core value types: identities, amounts, and the epoch phase.
//!
//! Amounts are token base units held in a `u128`: an 18-decimal token
//! overflows `u64` at roughly 18 whole tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token amount in base units.
pub type Amount = u128;

/// Unix timestamp in seconds, always supplied by the caller.
pub type Timestamp = u64;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
            Default, bincode::Encode, bincode::Decode,
        )]
        pub struct $name(pub [u8; 32]);

        impl $name {
            /// All-zero identifier.
            pub const ZERO: Self = Self([0u8; 32]);

            /// Identifier with every byte set to `byte`.
            pub const fn repeat_byte(byte: u8) -> Self {
                Self([byte; 32])
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; 32]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode(self.0))
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }
    };
}

id_type!(
    /// A 32-byte account identity: owners, managers, destinations, and the
    /// reward manager itself as seen by its collaborators.
    Address
);

id_type!(
    /// A 32-byte fungible asset identifier on the token ledger.
    AssetId
);

/// Which half of the weekly cycle the scheduler will execute next.
///
/// Persisted explicitly; never derived from timestamps.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default,
    bincode::Encode, bincode::Decode,
)]
pub enum Phase {
    /// The next transition releases this week's payout.
    #[default]
    AwaitingPayout,
    /// The next transition rolls the epoch and decrements the weeks left.
    AwaitingCheckpoint,
}

impl Phase {
    /// The phase that follows this one.
    pub fn next(self) -> Self {
        match self {
            Self::AwaitingPayout => Self::AwaitingCheckpoint,
            Self::AwaitingCheckpoint => Self::AwaitingPayout,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingPayout => f.write_str("awaiting-payout"),
            Self::AwaitingCheckpoint => f.write_str("awaiting-checkpoint"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_display_is_lower_hex() {
        let addr = Address::repeat_byte(0xAB);
        assert_eq!(addr.to_string(), "ab".repeat(32));
    }

    #[test]
    fn zero_address_is_zero() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::repeat_byte(1).is_zero());
        assert_eq!(Address::default(), Address::ZERO);
    }

    #[test]
    fn asset_and_address_are_distinct_types_with_same_layout() {
        let asset = AssetId::from([7u8; 32]);
        let addr = Address::from([7u8; 32]);
        assert_eq!(asset.as_bytes(), addr.as_bytes());
    }

    #[test]
    fn phase_alternates() {
        assert_eq!(Phase::AwaitingPayout.next(), Phase::AwaitingCheckpoint);
        assert_eq!(Phase::AwaitingCheckpoint.next(), Phase::AwaitingPayout);
        assert_eq!(Phase::default(), Phase::AwaitingPayout);
    }

    #[test]
    fn phase_serde_roundtrip() {
        let json = serde_json::to_string(&Phase::AwaitingCheckpoint).unwrap();
        let decoded: Phase = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, Phase::AwaitingCheckpoint);
    }
}
