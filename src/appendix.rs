// 3.0: order appendix codec. execution behavior rides in one packed 128-bit
// integer next to the order. bit layout, low to high:
//
//   | value | reserved | trigger | reduce only | order type | isolated | version |
//   | 64    | 50       | 2       | 1           | 2          | 1        | 8       |
//   | 127..64 | 63..14 | 13..12  | 11          | 10..9      | 8        | 7..0    |
//
// decode is total: every bit pattern maps back to flags, and reserved/value
// round-trip losslessly even though this client never sets them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Appendix format version this client emits.
pub const APPENDIX_VERSION: u8 = 1;

const ISOLATED_SHIFT: u32 = 8;
const ORDER_TYPE_SHIFT: u32 = 9;
const REDUCE_ONLY_SHIFT: u32 = 11;
const TRIGGER_SHIFT: u32 = 12;
const RESERVED_SHIFT: u32 = 14;
const VALUE_SHIFT: u32 = 64;

const TWO_BIT_MASK: u128 = 0b11;
const RESERVED_BITS: u32 = 50;
const RESERVED_MASK: u64 = (1 << RESERVED_BITS) - 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppendixError {
    #[error("invalid order execution type {0}, expected 0..=3")]
    InvalidExecutionType(u8),

    #[error("invalid trigger type {0}, expected 0..=3")]
    InvalidTriggerType(u8),

    #[error("appendix field {field} value {value} exceeds {bits} bits")]
    FieldOverflow {
        field: &'static str,
        value: u64,
        bits: u32,
    },
}

/// How the order executes once it reaches the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionType {
    /// Rest on the book until filled or canceled.
    Default,
    /// Immediate or cancel.
    Ioc,
    /// Fill or kill.
    Fok,
    /// Maker only. Rejected if it would take liquidity.
    PostOnly,
}

impl ExecutionType {
    pub fn bits(&self) -> u8 {
        match self {
            ExecutionType::Default => 0,
            ExecutionType::Ioc => 1,
            ExecutionType::Fok => 2,
            ExecutionType::PostOnly => 3,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => ExecutionType::Default,
            1 => ExecutionType::Ioc,
            2 => ExecutionType::Fok,
            _ => ExecutionType::PostOnly,
        }
    }

    /// Checked conversion for externally supplied raw values.
    pub fn try_from_raw(raw: u8) -> Result<Self, AppendixError> {
        if raw > 3 {
            return Err(AppendixError::InvalidExecutionType(raw));
        }
        Ok(Self::from_bits(raw))
    }
}

/// Trigger semantics. This client only emits `None`; the rest exist so
/// foreign appendixes decode faithfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    None,
    Price,
    Twap,
    TwapCustom,
}

impl TriggerType {
    pub fn bits(&self) -> u8 {
        match self {
            TriggerType::None => 0,
            TriggerType::Price => 1,
            TriggerType::Twap => 2,
            TriggerType::TwapCustom => 3,
        }
    }

    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => TriggerType::None,
            1 => TriggerType::Price,
            2 => TriggerType::Twap,
            _ => TriggerType::TwapCustom,
        }
    }

    pub fn try_from_raw(raw: u8) -> Result<Self, AppendixError> {
        if raw > 3 {
            return Err(AppendixError::InvalidTriggerType(raw));
        }
        Ok(Self::from_bits(raw))
    }
}

/// Unpacked appendix fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderAppendix {
    pub version: u8,
    /// Isolated margin when true, cross margin when false.
    pub isolated: bool,
    pub order_type: ExecutionType,
    pub reduce_only: bool,
    pub trigger: TriggerType,
    /// Reserved mid bits (50 wide). Must be zero unless echoing a foreign appendix.
    pub reserved: u64,
    /// High 64 bits. Trigger payload on some venues; unused by this client.
    pub value: u64,
}

impl OrderAppendix {
    /// Appendix for a plain limit order: current version, cross margin,
    /// no trigger.
    pub fn for_execution(order_type: ExecutionType, reduce_only: bool) -> Self {
        Self {
            version: APPENDIX_VERSION,
            isolated: false,
            order_type,
            reduce_only,
            trigger: TriggerType::None,
            reserved: 0,
            value: 0,
        }
    }

    /// Pack into the wire integer. Deterministic and pure.
    pub fn encode(&self) -> Result<u128, AppendixError> {
        if self.reserved > RESERVED_MASK {
            return Err(AppendixError::FieldOverflow {
                field: "reserved",
                value: self.reserved,
                bits: RESERVED_BITS,
            });
        }

        Ok(self.version as u128
            | (self.isolated as u128) << ISOLATED_SHIFT
            | (self.order_type.bits() as u128) << ORDER_TYPE_SHIFT
            | (self.reduce_only as u128) << REDUCE_ONLY_SHIFT
            | (self.trigger.bits() as u128) << TRIGGER_SHIFT
            | (self.reserved as u128) << RESERVED_SHIFT
            | (self.value as u128) << VALUE_SHIFT)
    }

    /// Unpack a wire integer. Bit-exact inverse of `encode`.
    pub fn decode(raw: u128) -> Self {
        Self {
            version: (raw & 0xFF) as u8,
            isolated: (raw >> ISOLATED_SHIFT) & 1 == 1,
            order_type: ExecutionType::from_bits(((raw >> ORDER_TYPE_SHIFT) & TWO_BIT_MASK) as u8),
            reduce_only: (raw >> REDUCE_ONLY_SHIFT) & 1 == 1,
            trigger: TriggerType::from_bits(((raw >> TRIGGER_SHIFT) & TWO_BIT_MASK) as u8),
            reserved: ((raw >> RESERVED_SHIFT) as u64) & RESERVED_MASK,
            value: (raw >> VALUE_SHIFT) as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_gtc_appendix_is_just_the_version() {
        let appendix = OrderAppendix::for_execution(ExecutionType::Default, false);
        assert_eq!(appendix.encode().unwrap(), 1);
    }

    #[test]
    fn post_only_reduce_only_bit_positions() {
        let appendix = OrderAppendix::for_execution(ExecutionType::PostOnly, true);
        // version 1 | order_type 3 << 9 | reduce_only << 11
        assert_eq!(appendix.encode().unwrap(), 1 | (3 << 9) | (1 << 11));
    }

    #[test]
    fn ioc_bit_position() {
        let appendix = OrderAppendix::for_execution(ExecutionType::Ioc, false);
        assert_eq!(appendix.encode().unwrap(), 1 | (1 << 9));
    }

    #[test]
    fn decode_inverts_encode() {
        let appendix = OrderAppendix {
            version: 7,
            isolated: true,
            order_type: ExecutionType::Fok,
            reduce_only: true,
            trigger: TriggerType::Twap,
            reserved: 0x3_0000_0001,
            value: u64::MAX,
        };
        let raw = appendix.encode().unwrap();
        assert_eq!(OrderAppendix::decode(raw), appendix);
    }

    #[test]
    fn encode_inverts_decode_for_arbitrary_bits() {
        for raw in [0u128, 1, u128::MAX, 0xDEAD_BEEF_0000_1234_5678_9ABC_DEF0_1122] {
            let decoded = OrderAppendix::decode(raw);
            assert_eq!(decoded.encode().unwrap(), raw);
        }
    }

    #[test]
    fn reserved_overflow_rejected() {
        let appendix = OrderAppendix {
            reserved: 1 << 50,
            ..OrderAppendix::for_execution(ExecutionType::Default, false)
        };
        assert!(matches!(
            appendix.encode(),
            Err(AppendixError::FieldOverflow { field: "reserved", .. })
        ));
    }

    #[test]
    fn raw_field_values_above_width_rejected() {
        assert!(matches!(
            ExecutionType::try_from_raw(4),
            Err(AppendixError::InvalidExecutionType(4))
        ));
        assert!(matches!(
            TriggerType::try_from_raw(5),
            Err(AppendixError::InvalidTriggerType(5))
        ));
        assert_eq!(ExecutionType::try_from_raw(3).unwrap(), ExecutionType::PostOnly);
    }
}
