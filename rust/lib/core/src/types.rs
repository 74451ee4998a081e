use chrono::{DateTime, Duration, Utc};

/// Generate a new random ID (UUIDv4, no dashes).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string().replace('-', "")
}

/// Current UTC time.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// A timestamp for a write that must sort strictly after `previous`.
///
/// Two writes inside the same clock tick (or a clock that stepped
/// backwards) would otherwise produce equal or decreasing values.
pub fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now_utc();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
