//! Property-based tests for the wire codecs.
//!
//! These tests verify the x18 codec, the appendix bitfield, and the order
//! builder hold their invariants under random inputs.

use perp_trader::*;
use proptest::prelude::*;
use rust_decimal::Decimal;

// Largest whole-number magnitude whose x18 encoding still fits a decimal
// mantissa: (2^96 - 1) / 10^18, truncated.
const MAX_WHOLE_X18: i64 = 79_228_162_514;

// Strategies for generating test data
fn decimal_strategy() -> impl Strategy<Value = Decimal> {
    // mantissas capped at the whole-number bound stay encodable at any scale
    (-MAX_WHOLE_X18..=MAX_WHOLE_X18, 0u32..=18).prop_map(|(m, scale)| Decimal::new(m, scale))
}

fn price_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|x| Decimal::new(x, 2))
}

fn size_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|x| Decimal::new(x, 4))
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Buy), Just(Side::Sell)]
}

fn tif_strategy() -> impl Strategy<Value = TimeInForce> {
    prop_oneof![
        Just(TimeInForce::GTC),
        Just(TimeInForce::IOC),
        Just(TimeInForce::FOK),
    ]
}

fn sender() -> Subaccount {
    Subaccount::new("0x0000000000000000000000000000000000000001", "default")
}

proptest! {
    /// Any decimal with at most 18 fractional digits survives the x18 round trip
    #[test]
    fn x18_round_trip(value in decimal_strategy()) {
        let raw = to_x18(value).unwrap();
        prop_assert_eq!(from_x18(raw).unwrap(), value.normalize());
    }

    /// Magnitudes past the decodable range are rejected at encode time, so
    /// the round trip holds on the codec's entire image
    #[test]
    fn x18_rejects_undecodable_magnitudes(m in (MAX_WHOLE_X18 + 1)..i64::MAX) {
        prop_assert!(matches!(
            to_x18(Decimal::from(m)),
            Err(FixedPointError::OutOfRange(_))
        ));
    }

    /// Encoding preserves sign
    #[test]
    fn x18_preserves_sign(value in decimal_strategy()) {
        let raw = to_x18(value).unwrap();
        prop_assert_eq!(raw.is_negative(), value.is_sign_negative() && !value.is_zero());
        prop_assert_eq!(raw == 0, value.is_zero());
    }

    /// Decode is total and encode inverts it exactly: every u128 is a valid
    /// appendix and no bit is lost
    #[test]
    fn appendix_decode_encode_identity(raw in any::<u128>()) {
        let appendix = OrderAppendix::decode(raw);
        prop_assert_eq!(appendix.encode().unwrap(), raw);
    }

    /// Encode then decode recovers every field
    #[test]
    fn appendix_encode_decode_identity(
        version in any::<u8>(),
        isolated in any::<bool>(),
        order_type_bits in 0u8..4,
        reduce_only in any::<bool>(),
        trigger_bits in 0u8..4,
        reserved in 0u64..(1 << 50),
        value in any::<u64>(),
    ) {
        let appendix = OrderAppendix {
            version,
            isolated,
            order_type: ExecutionType::try_from_raw(order_type_bits).unwrap(),
            reduce_only,
            trigger: TriggerType::try_from_raw(trigger_bits).unwrap(),
            reserved,
            value,
        };
        let raw = appendix.encode().unwrap();
        prop_assert_eq!(OrderAppendix::decode(raw), appendix);
    }

    /// The wire amount always carries the side's sign and the absolute size
    #[test]
    fn wire_amount_sign_matches_side(
        side in side_strategy(),
        price in price_strategy(),
        size in size_strategy(),
    ) {
        let params = OrderParams {
            product_id: ProductId(2),
            side,
            price,
            size,
            reduce_only: false,
            post_only: false,
            time_in_force: TimeInForce::GTC,
        };
        let order = build_wire_order(&params, sender(), Timestamp::from_secs(0), 1).unwrap();

        match side {
            Side::Buy => prop_assert!(order.amount_x18 > 0),
            Side::Sell => prop_assert!(order.amount_x18 < 0),
        }
        prop_assert_eq!(from_x18(order.amount_x18).unwrap().abs(), size.normalize());
    }

    /// Expiration is now plus the window determined by time in force
    #[test]
    fn expiration_follows_time_in_force(
        tif in tif_strategy(),
        now in 0i64..4_000_000_000,
        price in price_strategy(),
        size in size_strategy(),
    ) {
        let params = OrderParams {
            product_id: ProductId(2),
            side: Side::Buy,
            price,
            size,
            reduce_only: false,
            post_only: false,
            time_in_force: tif,
        };
        let order = build_wire_order(&params, sender(), Timestamp::from_secs(now), 1).unwrap();

        let expected = match tif {
            TimeInForce::GTC => now + GTC_EXPIRY_SECS,
            TimeInForce::IOC | TimeInForce::FOK => now + IOC_FOK_EXPIRY_SECS,
        };
        prop_assert_eq!(order.expiration, expected);
    }

    /// The appendix on a built order decodes to the requested execution flags
    #[test]
    fn wire_appendix_reflects_flags(
        tif in tif_strategy(),
        post_only in any::<bool>(),
        reduce_only in any::<bool>(),
    ) {
        let params = OrderParams {
            product_id: ProductId(2),
            side: Side::Buy,
            price: Decimal::ONE_HUNDRED,
            size: Decimal::ONE,
            reduce_only,
            post_only,
            time_in_force: tif,
        };
        let order = build_wire_order(&params, sender(), Timestamp::from_secs(0), 1).unwrap();
        let appendix = OrderAppendix::decode(order.appendix);

        prop_assert_eq!(appendix.order_type, tif.execution_type(post_only));
        prop_assert_eq!(appendix.reduce_only, reduce_only);
        prop_assert_eq!(appendix.trigger, TriggerType::None);
        prop_assert_eq!(appendix.version, APPENDIX_VERSION);
    }
}
