use chrono::{DateTime, Utc};

/// Injectable time source.
///
/// Every phase-gated service resolves "now" through this trait so that
/// window checks are testable without waiting for wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time. The production implementation.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
