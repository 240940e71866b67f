// 2.0: x18 fixed point codec. the wire carries prices and amounts as integers
// scaled by 10^18. conversion must be exact or fail: a silently truncated
// price is a mispriced order.

use rust_decimal::Decimal;
use thiserror::Error;

/// Fractional digits carried by the wire representation.
pub const X18_SCALE: u32 = 18;

/// Largest raw magnitude a decimal mantissa can carry (96 bits). Anything
/// above this encodes fine into i128 but can never decode back.
pub const MAX_X18_RAW: i128 = (1 << 96) - 1;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixedPointError {
    #[error("value {0} has more than {X18_SCALE} fractional digits")]
    TooPrecise(Decimal),

    #[error("value {0} exceeds the x18 representable range")]
    OutOfRange(Decimal),

    #[error("raw x18 value {0} exceeds the decimal representable range")]
    RawOutOfRange(i128),
}

/// Convert a decimal to its x18 wire integer. Exact for every input with
/// at most 18 fractional digits; sign is preserved.
pub fn to_x18(value: Decimal) -> Result<i128, FixedPointError> {
    let normalized = value.normalize();
    let scale = normalized.scale();
    if scale > X18_SCALE {
        return Err(FixedPointError::TooPrecise(value));
    }

    let factor = 10i128.pow(X18_SCALE - scale);
    let raw = normalized
        .mantissa()
        .checked_mul(factor)
        .ok_or(FixedPointError::OutOfRange(value))?;

    // reject anything decode cannot carry back, so the round trip holds
    // over the whole image
    if raw.abs() > MAX_X18_RAW {
        return Err(FixedPointError::OutOfRange(value));
    }
    Ok(raw)
}

/// Convert an x18 wire integer back to a decimal. Exact inverse of `to_x18`
/// on its entire image.
pub fn from_x18(raw: i128) -> Result<Decimal, FixedPointError> {
    Decimal::try_from_i128_with_scale(raw, X18_SCALE)
        .map(|d| d.normalize())
        .map_err(|_| FixedPointError::RawOutOfRange(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn whole_number() {
        assert_eq!(to_x18(dec!(1)).unwrap(), 1_000_000_000_000_000_000);
        assert_eq!(to_x18(dec!(45000)).unwrap(), 45_000_000_000_000_000_000_000);
    }

    #[test]
    fn fractional_number() {
        assert_eq!(to_x18(dec!(1.5)).unwrap(), 1_500_000_000_000_000_000);
        assert_eq!(to_x18(dec!(0.000001)).unwrap(), 1_000_000_000_000);
    }

    #[test]
    fn zero_maps_to_zero() {
        assert_eq!(to_x18(Decimal::ZERO).unwrap(), 0);
        assert_eq!(from_x18(0).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn sign_preserved() {
        assert_eq!(to_x18(dec!(-1.5)).unwrap(), -1_500_000_000_000_000_000);
        assert_eq!(from_x18(-1_500_000_000_000_000_000).unwrap(), dec!(-1.5));
    }

    #[test]
    fn round_trip() {
        for v in [
            dec!(0.1),
            dec!(45000.25),
            dec!(-0.000000000000000001), // 18 fractional digits
            dec!(123456789.987654321),
        ] {
            assert_eq!(from_x18(to_x18(v).unwrap()).unwrap(), v);
        }
    }

    #[test]
    fn trailing_zeros_do_not_change_encoding() {
        assert_eq!(to_x18(dec!(1.50)).unwrap(), to_x18(dec!(1.5)).unwrap());
    }

    #[test]
    fn too_precise_rejected() {
        // 19 fractional digits cannot be carried exactly
        let v = Decimal::new(1, 19);
        assert!(matches!(to_x18(v), Err(FixedPointError::TooPrecise(_))));
    }

    #[test]
    fn overflow_rejected() {
        assert!(matches!(
            to_x18(Decimal::MAX),
            Err(FixedPointError::OutOfRange(_))
        ));
    }

    #[test]
    fn values_beyond_decode_range_rejected() {
        // 9.2e18 scales to 9.2e36: it fits i128 but no decimal mantissa,
        // so encoding it would break the round trip
        assert!(matches!(
            to_x18(Decimal::from(i64::MAX)),
            Err(FixedPointError::OutOfRange(_))
        ));
        assert!(matches!(
            to_x18(Decimal::from(80_000_000_000i64)),
            Err(FixedPointError::OutOfRange(_))
        ));
    }

    #[test]
    fn max_raw_round_trips() {
        let value = from_x18(MAX_X18_RAW).unwrap();
        assert_eq!(to_x18(value).unwrap(), MAX_X18_RAW);
    }

    #[test]
    fn largest_whole_value_round_trips() {
        // 2^96 - 1 scaled down 18 digits is ~7.9e10
        let v = dec!(79228162514);
        assert_eq!(from_x18(to_x18(v).unwrap()).unwrap(), v);
    }

    #[test]
    fn raw_overflow_rejected() {
        assert!(matches!(
            from_x18(i128::MAX),
            Err(FixedPointError::RawOutOfRange(_))
        ));
    }
}
