//! Shared utilities for commands

/// Current time as a Unix timestamp in seconds
pub fn now_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Format a Unix timestamp for display in local time
pub fn format_timestamp(secs: i64) -> String {
    match chrono::DateTime::from_timestamp(secs, 0) {
        Some(dt) => dt
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        None => "-".to_string(),
    }
}
