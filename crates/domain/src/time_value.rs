use crate::DomainError;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const WEEK: u64 = 7 * DAY;

/// Parses a zone-file time value such as `3600`, `30s`, `7m`, `1h`, `5d` or `2w` into seconds.
pub fn parse_time_value(value: &str) -> Result<u64, DomainError> {
    let value = value.trim();
    let invalid = || DomainError::InvalidTimeValue(value.to_string());

    let (digits, multiplier) = match value.as_bytes().last().map(u8::to_ascii_lowercase) {
        Some(b's') => (&value[..value.len() - 1], 1),
        Some(b'm') => (&value[..value.len() - 1], MINUTE),
        Some(b'h') => (&value[..value.len() - 1], HOUR),
        Some(b'd') => (&value[..value.len() - 1], DAY),
        Some(b'w') => (&value[..value.len() - 1], WEEK),
        Some(_) => (value, 1),
        None => return Err(invalid()),
    };

    let n: u64 = digits.parse().map_err(|_| invalid())?;
    n.checked_mul(multiplier).ok_or_else(invalid)
}

/// Same as [`parse_time_value`] but narrowed to a DNS TTL.
pub fn parse_ttl(value: &str) -> Result<u32, DomainError> {
    let secs = parse_time_value(value)?;
    u32::try_from(secs).map_err(|_| DomainError::InvalidTimeValue(value.to_string()))
}
