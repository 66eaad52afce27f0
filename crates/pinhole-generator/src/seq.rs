use crate::Generator;
use pinhole_core::ShortCode;
use std::sync::atomic::{AtomicU64, Ordering};

/// Deterministic generator yielding `{prefix}{n}` for n = 0, 1, 2, ...
///
/// Handy in tests where predictable codes (and forced collisions) are needed.
#[derive(Debug, Default)]
pub struct SeqGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SeqGenerator {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Starts counting at `start` instead of zero.
    pub fn starting_at(mut self, start: u64) -> Self {
        self.counter = AtomicU64::new(start);
        self
    }
}

impl Generator for SeqGenerator {
    type Output = ShortCode;

    fn generate(&self) -> Self::Output {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        ShortCode::generated(format!("{}{}", self.prefix, n))
    }
}
