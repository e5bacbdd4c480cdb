use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, saturating instead of panicking on clock skew.
pub fn current_unix_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
