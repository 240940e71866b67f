// 4.0: order construction. turns trader-supplied decimals into the exact wire
// shape: x18 price, sign-carrying x18 amount, packed appendix, expiration,
// nonce. everything is validated before any of it leaves the process.

use crate::appendix::{AppendixError, ExecutionType, OrderAppendix};
use crate::fixed_point::{to_x18, FixedPointError};
use crate::types::{ProductId, Side, Subaccount, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// GTC orders expire 30 days after submission.
pub const GTC_EXPIRY_SECS: i64 = 2_592_000;
/// IOC/FOK orders get a 5 minute window.
pub const IOC_FOK_EXPIRY_SECS: i64 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeInForce {
    /// Good till canceled.
    GTC,
    /// Immediate or cancel.
    IOC,
    /// Fill or kill.
    FOK,
}

impl Default for TimeInForce {
    fn default() -> Self {
        Self::GTC
    }
}

impl TimeInForce {
    /// Execution type for the appendix. Post-only wins over time in force.
    pub fn execution_type(&self, post_only: bool) -> ExecutionType {
        if post_only {
            return ExecutionType::PostOnly;
        }
        match self {
            TimeInForce::GTC => ExecutionType::Default,
            TimeInForce::IOC => ExecutionType::Ioc,
            TimeInForce::FOK => ExecutionType::Fok,
        }
    }

    pub fn expiry_window_secs(&self) -> i64 {
        match self {
            TimeInForce::GTC => GTC_EXPIRY_SECS,
            TimeInForce::IOC | TimeInForce::FOK => IOC_FOK_EXPIRY_SECS,
        }
    }
}

impl FromStr for TimeInForce {
    type Err = &'static str;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "GTC" => Ok(Self::GTC),
            "IOC" => Ok(Self::IOC),
            "FOK" => Ok(Self::FOK),
            _ => Err("invalid time in force; expected GTC|IOC|FOK"),
        }
    }
}

/// Trader-supplied limit order parameters, before encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderParams {
    pub product_id: ProductId,
    pub side: Side,
    pub price: Decimal,
    /// Absolute size. The builder applies the side's sign.
    pub size: Decimal,
    pub reduce_only: bool,
    pub post_only: bool,
    pub time_in_force: TimeInForce,
}

/// Fully encoded order, ready for the signing client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireOrder {
    pub sender: Subaccount,
    pub product_id: ProductId,
    pub price_x18: i128,
    /// Signed amount: positive = buy, negative = sell.
    pub amount_x18: i128,
    /// Unix seconds.
    pub expiration: i64,
    pub nonce: u64,
    pub appendix: u128,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    #[error("order size must be positive, got {0}")]
    NonPositiveSize(Decimal),

    #[error("order price must be positive, got {0}")]
    NonPositivePrice(Decimal),

    #[error(transparent)]
    FixedPoint(#[from] FixedPointError),

    #[error(transparent)]
    Appendix(#[from] AppendixError),
}

/// Build a wire order from validated parameters. Rejects locally before any
/// network interaction; never mutates shared state.
pub fn build_wire_order(
    params: &OrderParams,
    sender: Subaccount,
    now: Timestamp,
    nonce: u64,
) -> Result<WireOrder, OrderError> {
    if params.size <= Decimal::ZERO {
        return Err(OrderError::NonPositiveSize(params.size));
    }
    if params.price <= Decimal::ZERO {
        return Err(OrderError::NonPositivePrice(params.price));
    }

    let price_x18 = to_x18(params.price)?;
    let amount_x18 = to_x18(params.side.sign() * params.size.abs())?;

    let appendix = OrderAppendix::for_execution(
        params.time_in_force.execution_type(params.post_only),
        params.reduce_only,
    )
    .encode()?;

    Ok(WireOrder {
        sender,
        product_id: params.product_id,
        price_x18,
        amount_x18,
        expiration: now.plus_secs(params.time_in_force.expiry_window_secs()).as_secs(),
        nonce,
        appendix,
    })
}
