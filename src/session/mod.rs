// 11.0: trading session. owns the client handle, the product catalog, the
// nonce generator, and the mutex-guarded pending order cache. every public
// trading operation lives here.

mod core;
mod orders;
mod positions;
mod results;

pub use core::TraderSession;
pub use results::{CancelOutcome, PlacedOrder, TraderError};
