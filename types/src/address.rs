//! Account, registry and asset identifiers.
//!
//! All three are 20-byte identifiers rendered as `0x`-prefixed lowercase hex.
//! They are distinct types so a registry can never be passed where an asset
//! is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PermitError;

/// A 20-byte account identifier (transfer sender or recipient).
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 20]);

impl Address {
    /// The textual prefix for every rendered address.
    pub const PREFIX: &'static str = "0x";

    /// Width of the canonical encoding.
    pub const LEN: usize = 20;

    pub const ZERO: Self = Self([0u8; 20]);

    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = PermitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| PermitError::InvalidAddress(format!("{s:?}: missing 0x prefix")))?;
        if digits.len() != Self::LEN * 2 {
            return Err(PermitError::InvalidAddress(format!(
                "{s:?}: expected {} hex digits, got {}",
                Self::LEN * 2,
                digits.len()
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(digits, &mut bytes)
            .map_err(|e| PermitError::InvalidAddress(format!("{s:?}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::PREFIX, hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

macro_rules! address_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(Address);

        impl $name {
            pub fn new(address: Address) -> Self {
                Self(address)
            }

            pub fn address(&self) -> &Address {
                &self.0
            }

            pub fn as_bytes(&self) -> &[u8; 20] {
                self.0.as_bytes()
            }
        }

        impl From<Address> for $name {
            fn from(address: Address) -> Self {
                Self(address)
            }
        }

        impl FromStr for $name {
            type Err = PermitError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

address_newtype!(
    /// Identifies one policy registry, the owner of an approval namespace.
    RegistryId
);

address_newtype!(
    /// Identifies the token a registry governs.
    AssetId
);

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0x00112233445566778899aabbccddeeff00112233";

    #[test]
    fn parse_and_display_round_trip() {
        let addr: Address = SAMPLE.parse().unwrap();
        assert_eq!(addr.to_string(), SAMPLE);
        assert_eq!(addr.as_bytes()[1], 0x11);
    }

    #[test]
    fn parse_accepts_uppercase_digits() {
        let addr: Address = "0x00112233445566778899AABBCCDDEEFF00112233".parse().unwrap();
        assert_eq!(addr.to_string(), SAMPLE);
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        let err = "00112233445566778899aabbccddeeff00112233".parse::<Address>().unwrap_err();
        assert!(matches!(err, PermitError::InvalidAddress(_)));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!("0x0011".parse::<Address>().is_err());
        assert!(format!("{SAMPLE}00").parse::<Address>().is_err());
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!("0x00112233445566778899aabbccddeeff0011zz33".parse::<Address>().is_err());
    }

    #[test]
    fn newtypes_share_rendering() {
        let registry: RegistryId = SAMPLE.parse().unwrap();
        let asset = AssetId::new(*registry.address());
        assert_eq!(registry.to_string(), asset.to_string());
        assert_eq!(format!("{registry:?}"), format!("RegistryId({SAMPLE})"));
    }

    #[test]
    fn zero_address() {
        assert!(Address::ZERO.is_zero());
        assert!(!Address::new([1; 20]).is_zero());
    }
}
