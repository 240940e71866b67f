// 1.0: primitives shared by every module. IDs, order sides, timestamps,
// subaccount addressing. each is a newtype so the compiler catches type mixups.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProductId(pub u32);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Exchange-assigned order identifier. Opaque hex string, unique per order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub String);

impl Digest {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Digest {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// 1.1: order side. the wire carries no side field: Buy = positive amount,
// Sell = negative amount. sign() is the single source of that convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Buy => dec!(1),
            Side::Sell => dec!(-1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    pub fn from_amount(amount: Decimal) -> Option<Self> {
        if amount > Decimal::ZERO {
            Some(Side::Buy)
        } else if amount < Decimal::ZERO {
            Some(Side::Sell)
        } else {
            None
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

// 1.2: position direction, derived from a signed balance. amount == 0 means
// no position and is excluded from listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    pub fn from_amount(amount: Decimal) -> Option<Self> {
        if amount > Decimal::ZERO {
            Some(PositionSide::Long)
        } else if amount < Decimal::ZERO {
            Some(PositionSide::Short)
        } else {
            None
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSide::Long => write!(f, "long"),
            PositionSide::Short => write!(f, "short"),
        }
    }
}

// 1.3: unix timestamp in whole seconds. expirations are second-granular.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp())
    }

    pub fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    pub fn as_secs(&self) -> i64 {
        self.0
    }

    pub fn plus_secs(&self, secs: i64) -> Self {
        Self(self.0 + secs)
    }
}

// 1.4: subaccount = wallet address + short name, packed into a bytes32 sender.
// layout: 20 address bytes then the name padded with zero bytes to 12.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subaccount {
    owner: String,
    name: String,
}

pub const MAX_SUBACCOUNT_NAME_BYTES: usize = 12;

impl Subaccount {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let owner = owner
            .strip_prefix("0x")
            .unwrap_or(&owner)
            .to_ascii_lowercase();
        Self {
            owner,
            name: name.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hex-encoded bytes32 sender used on every signed request.
    pub fn to_hex(&self) -> String {
        let name_bytes = self.name.as_bytes();
        let take = name_bytes.len().min(MAX_SUBACCOUNT_NAME_BYTES);
        let name_hex = hex::encode(&name_bytes[..take]);
        format!("0x{}{:0<24}", self.owner, name_hex)
    }
}

impl fmt::Display for Subaccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_sign_convention() {
        assert_eq!(Side::Buy.sign(), dec!(1));
        assert_eq!(Side::Sell.sign(), dec!(-1));
        assert_eq!(Side::Buy.opposite(), Side::Sell);
    }

    #[test]
    fn side_from_amount() {
        assert_eq!(Side::from_amount(dec!(0.5)), Some(Side::Buy));
        assert_eq!(Side::from_amount(dec!(-0.5)), Some(Side::Sell));
        assert_eq!(Side::from_amount(Decimal::ZERO), None);
    }

    #[test]
    fn position_side_from_amount() {
        assert_eq!(PositionSide::from_amount(dec!(2)), Some(PositionSide::Long));
        assert_eq!(PositionSide::from_amount(dec!(-2)), Some(PositionSide::Short));
        assert_eq!(PositionSide::from_amount(Decimal::ZERO), None);
    }

    #[test]
    fn subaccount_hex_layout() {
        let sub = Subaccount::new("0xAbCd000000000000000000000000000000001234", "default");
        let hex = sub.to_hex();
        // 0x + 40 address chars + 24 name chars
        assert_eq!(hex.len(), 2 + 40 + 24);
        assert!(hex.starts_with("0xabcd000000000000000000000000000000001234"));
        // "default" = 64656661756c74, zero-padded to 12 bytes
        assert!(hex.ends_with("64656661756c740000000000"));
    }

    #[test]
    fn subaccount_name_truncated_at_12_bytes() {
        let sub = Subaccount::new(
            "0x0000000000000000000000000000000000000001",
            "averylongsubaccount",
        );
        assert_eq!(sub.to_hex().len(), 2 + 40 + 24);
    }

    #[test]
    fn timestamp_arithmetic() {
        let t = Timestamp::from_secs(1_000);
        assert_eq!(t.plus_secs(300).as_secs(), 1_300);
    }
}
