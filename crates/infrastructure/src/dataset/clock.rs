use std::time::{SystemTime, UNIX_EPOCH};

#[inline]
pub(crate) fn unix_micros(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

#[inline]
pub(crate) fn now_micros() -> u64 {
    unix_micros(SystemTime::now())
}

#[inline]
pub(crate) fn now_secs() -> u64 {
    now_micros() / 1_000_000
}
