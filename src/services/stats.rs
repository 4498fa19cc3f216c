//! Hit accounting
//!
//! Every hit bumps an all-time counter and appends a nanosecond timestamp to
//! a per-code log. The log is pruned to the last seven days on write only;
//! reads filter by threshold, so stale entries never leak into counts.

use std::sync::Arc;

use chrono::Utc;
use tracing::trace;

use crate::errors::{KvLinkerError, Result};
use crate::storage::keys;
use crate::storage::{KvRead, KvStore, WriteTxn};

const NANOS_PER_HOUR: u64 = 3_600 * 1_000_000_000;

/// 24 小时（纳秒）
pub const DAY_NANOS: u64 = 24 * NANOS_PER_HOUR;

/// 7 天（纳秒）
pub const WEEK_NANOS: u64 = 7 * DAY_NANOS;

/// Current wall clock as nanoseconds since the Unix epoch.
pub fn now_nanos() -> u64 {
    Utc::now()
        .timestamp_nanos_opt()
        .map(|ns| ns.max(0) as u64)
        .unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkStats {
    pub code: String,
    pub target: String,
    pub overall: u64,
    pub week_count: u64,
    pub day_count: u64,
}

/// Add one to the all-time counter inside an open transaction.
pub fn increment_counter_in(txn: &mut WriteTxn<'_>, code: &str) -> Result<u64> {
    let key = keys::counter_key(code);
    let counter = txn
        .get_u64(&key, 0)
        .map_err(|e| e.with_context("failed to get counter"))?
        + 1;
    txn.set_u64(&key, counter)
        .map_err(|e| e.with_context("failed to save counter"))?;
    Ok(counter)
}

/// Append `now` to the week log and drop everything at or before `now - 7d`.
///
/// Returns the retained length.
pub fn increment_week_log_in(txn: &mut WriteTxn<'_>, code: &str, now: u64) -> Result<usize> {
    let key = keys::week_log_key(code);
    let mut week_log = txn
        .get_u64_list(&key)
        .map_err(|e| e.with_context("couldn't get week log"))?;

    week_log.push(now);
    let week_ago = now.saturating_sub(WEEK_NANOS);
    week_log.retain(|&ts| ts > week_ago);

    txn.set_u64_list(&key, &week_log)
        .map_err(|e| e.with_context("couldn't save week log"))?;
    Ok(week_log.len())
}

fn count_newer(log: &[u64], threshold: u64) -> u64 {
    log.iter().filter(|&&ts| ts > threshold).count() as u64
}

pub struct StatsEngine {
    store: Arc<KvStore>,
}

impl StatsEngine {
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    /// Bump the all-time counter in its own transaction.
    pub fn increment_counter(&self, code: &str) -> Result<u64> {
        self.store
            .update(|txn| increment_counter_in(txn, code))
            .map_err(|e| e.with_context("failed to increment counter"))
    }

    /// Append the current time to the week log in its own transaction.
    pub fn increment_week_log(&self, code: &str) -> Result<usize> {
        let now = now_nanos();
        self.store
            .update(|txn| increment_week_log_in(txn, code, now))
            .map_err(|e| e.with_context("failed to increment week log"))
    }

    pub fn record_hit(&self, code: &str) -> Result<()> {
        self.record_hit_at(code, now_nanos())
    }

    /// Counter and week log move together: one transaction per hit.
    pub fn record_hit_at(&self, code: &str, now: u64) -> Result<()> {
        self.store
            .update(|txn| {
                let overall = increment_counter_in(txn, code)?;
                let retained = increment_week_log_in(txn, code, now)?;
                trace!(
                    "Recorded hit for {}: overall={}, week_log={}",
                    code, overall, retained
                );
                Ok(())
            })
            .map_err(|e| {
                KvLinkerError::accounting_failure(e.to_string())
                    .with_context(format!("failed during updating the stats for {}", code))
            })
    }

    pub fn stat(&self, code: &str) -> Result<LinkStats> {
        self.stat_at(code, now_nanos())
    }

    /// Read-only; never prunes the stored log.
    pub fn stat_at(&self, code: &str, now: u64) -> Result<LinkStats> {
        self.store
            .read(|txn| {
                let Some(target) = txn
                    .get_string(&keys::url_key(code))
                    .map_err(|e| e.with_context("failed to get shortened url"))?
                    .filter(|target| !target.is_empty())
                else {
                    return Err(KvLinkerError::not_found(code));
                };

                let overall = txn
                    .get_u64(&keys::counter_key(code), 0)
                    .map_err(|e| e.with_context("failed to get counter"))?;
                let week_log = txn
                    .get_u64_list(&keys::week_log_key(code))
                    .map_err(|e| e.with_context("failed to get week log"))?;

                Ok(LinkStats {
                    code: code.to_string(),
                    target,
                    overall,
                    week_count: count_newer(&week_log, now.saturating_sub(WEEK_NANOS)),
                    day_count: count_newer(&week_log, now.saturating_sub(DAY_NANOS)),
                })
            })
            .map_err(|e| e.with_context("failed to get URL and stats"))
    }
}
