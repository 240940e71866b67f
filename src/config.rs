// 10.0 config.rs: trader settings in one place. opaque inputs to the session
// and the signing client; validated for presence and basic sanity only.

use crate::order::TimeInForce;
use crate::types::{ProductId, MAX_SUBACCOUNT_NAME_BYTES};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub const PLACEHOLDER_KEY: &str = "your_private_key_here";

const ENV_PRIVATE_KEY: &str = "TRADER_PRIVATE_KEY";
const ENV_NETWORK: &str = "TRADER_NETWORK";
const ENV_SUBACCOUNT: &str = "TRADER_SUBACCOUNT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl FromStr for Network {
    type Err = &'static str;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            _ => Err("invalid network; expected mainnet|testnet"),
        }
    }
}

/// Everything the session needs to run. Mirrors the shipped example config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraderConfig {
    /// Signing key, with or without the 0x prefix. Never logged.
    pub private_key: String,
    pub network: Network,
    /// Subaccount name, at most 12 bytes.
    pub subaccount_name: String,
    /// Product offered as the default in interactive flows.
    pub default_product_id: ProductId,
    pub default_order_size: Decimal,
    /// Offset from market for suggested limit prices: buys quote below,
    /// sells above.
    pub price_offset: Decimal,
    pub post_only: bool,
    pub reduce_only: bool,
    pub time_in_force: TimeInForce,
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self {
            private_key: PLACEHOLDER_KEY.to_string(),
            network: Network::Mainnet,
            subaccount_name: "default".to_string(),
            default_product_id: ProductId(8),
            default_order_size: Decimal::ONE,
            price_offset: Decimal::ONE,
            post_only: true,
            reduce_only: false,
            time_in_force: TimeInForce::GTC,
        }
    }
}

impl TraderConfig {
    /// Testnet preset with the same trading defaults.
    pub fn testnet(private_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            network: Network::Testnet,
            ..Self::default()
        }
    }

    /// Load key, network, and subaccount from the environment, keeping
    /// defaults for the trading settings.
    pub fn from_env() -> Result<Self, ConfigError> {
        let private_key = std::env::var(ENV_PRIVATE_KEY)
            .map_err(|_| ConfigError::MissingKey { var: ENV_PRIVATE_KEY })?;

        let mut config = Self {
            private_key,
            ..Self::default()
        };

        if let Ok(raw) = std::env::var(ENV_NETWORK) {
            config.network = raw.parse().map_err(|reason| ConfigError::InvalidValue {
                var: ENV_NETWORK,
                reason,
            })?;
        }
        if let Ok(name) = std::env::var(ENV_SUBACCOUNT) {
            config.subaccount_name = name;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.private_key.trim().is_empty() || self.private_key == PLACEHOLDER_KEY {
            return Err(ConfigError::MissingKey { var: ENV_PRIVATE_KEY });
        }

        if self.subaccount_name.len() > MAX_SUBACCOUNT_NAME_BYTES {
            return Err(ConfigError::InvalidValue {
                var: ENV_SUBACCOUNT,
                reason: "subaccount name longer than 12 bytes",
            });
        }

        if self.default_order_size <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                var: "default_order_size",
                reason: "must be positive",
            });
        }

        if self.price_offset < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                var: "price_offset",
                reason: "must not be negative",
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing or placeholder value for {var}")]
    MissingKey { var: &'static str },

    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: &'static str },
}
