//! Persisted key schema
//!
//! Keys are stable across releases; renaming any prefix orphans existing data.

pub const CODE_LENGTH_KEY: &str = "settings:last_length";
pub const URL_PREFIX: &str = "url:";
pub const COUNTER_PREFIX: &str = "hits:overall:";
pub const WEEK_LOG_PREFIX: &str = "hits:weeklog:";

#[inline]
pub fn url_key(code: &str) -> String {
    format!("{}{}", URL_PREFIX, code)
}

#[inline]
pub fn counter_key(code: &str) -> String {
    format!("{}{}", COUNTER_PREFIX, code)
}

#[inline]
pub fn week_log_key(code: &str) -> String {
    format!("{}{}", WEEK_LOG_PREFIX, code)
}
