use jiff::civil::DateTime;
use jiff::Zoned;

/// Source of the current local wall-clock time.
///
/// Expiry dates are stored as local civil date-times, so the evaluator
/// compares against the local time rather than a UTC timestamp.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current local date-time.
    fn now(&self) -> DateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime {
        Zoned::now().datetime()
    }
}
