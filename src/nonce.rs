// 5.0: nonce allocation. the venue requires a unique, roughly time-ordered
// nonce per submission. base is the wall clock in microseconds; an atomic
// floor guarantees strict monotonicity when two orders land in the same tick.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct NonceGenerator {
    last: AtomicU64,
}

impl NonceGenerator {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Allocate the next nonce. Strictly greater than every previously
    /// allocated value, safe under concurrent callers.
    pub fn next(&self) -> u64 {
        let candidate = chrono::Utc::now().timestamp_micros().max(0) as u64;
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let next = candidate.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(actual) => prev = actual,
            }
        }
    }
}
