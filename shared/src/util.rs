//! Time and identifier helpers

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh string entity id.
///
/// UUID v4: unique for any call pattern within (and across) process
/// lifetimes, usable directly as a map key and in persisted JSON.
pub fn uid() -> String {
    uuid::Uuid::new_v4().to_string()
}
