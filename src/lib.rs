// perp-trader: client-side trading core for a perpetual futures DEX.
// encoding-first architecture: everything the venue signs and matches is
// produced locally and exactly; network and signing sit behind one trait.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: ProductId, Digest, Side, Timestamp, Subaccount
//   2.x  fixed_point.rs: x18 codec between Decimal and wire i128
//   3.x  appendix.rs: 128-bit order appendix bitfield
//   4.x  order.rs: order construction: params -> signed wire order
//   5.x  nonce.rs: strictly increasing microsecond nonces
//   6.x  pending.rs: pending order cache + merged open-orders view
//   7.x  valuation.rs: position derivation and unrealized pnl
//   8.x  product.rs: product catalog, perp/spot split, leverage estimate
//   9.x  client.rs: exchange client boundary trait
//   10.x config.rs: trader settings, env loading, presets
//   11.x session/: trading session: place, cancel, query, value
//   12.x sim.rs: in-memory exchange (mocked)

// wire encoding modules
pub mod appendix;
pub mod fixed_point;
pub mod nonce;
pub mod order;
pub mod types;

// local state and valuation modules
pub mod pending;
pub mod product;
pub mod valuation;

// integration modules
pub mod client;
pub mod config;
pub mod session;
pub mod sim;

// re exports for convenience
pub use appendix::*;
pub use fixed_point::*;
pub use nonce::*;
pub use order::*;
pub use pending::*;
pub use product::*;
pub use types::*;
pub use valuation::*;
pub use client::{
    Balance, ClientError, DepthLevel, ExchangeClient, MarketDepth, OrderStatus, SubmitAck,
};
pub use config::{ConfigError, Network, TraderConfig};
pub use session::{CancelOutcome, PlacedOrder, TraderError, TraderSession};
pub use sim::SimExchange;
