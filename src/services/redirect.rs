use std::sync::Arc;

use tracing::{debug, trace};

use crate::analytics::{HitEvent, HitRecorder};
use crate::errors::{KvLinkerError, Result};
use crate::storage::{KvRead, KvStore, keys};

/// Resolves codes and hands answered redirects to the hit recorder.
pub struct Redirector {
    store: Arc<KvStore>,
    recorder: Arc<HitRecorder>,
}

impl Redirector {
    pub fn new(store: Arc<KvStore>, recorder: Arc<HitRecorder>) -> Self {
        Self { store, recorder }
    }

    /// Look up the target for `code`.
    ///
    /// Read-only. An empty stored target counts as unmapped.
    pub fn resolve(&self, code: &str) -> Result<String> {
        let target = self
            .store
            .read(|txn| txn.get_string(&keys::url_key(code)))
            .map_err(|e| e.with_context("failed to get shortened url"))?;

        match target {
            Some(target) if !target.is_empty() => {
                trace!("Resolved {} -> {}", code, target);
                Ok(target)
            }
            _ => {
                debug!("Redirect code not found: {}", code);
                Err(KvLinkerError::not_found(code))
            }
        }
    }

    /// Queue a hit for a redirect that has been answered. Never waits.
    pub fn record_hit(&self, code: &str, target: &str) {
        self.recorder.record(HitEvent::new(code, target));
    }

    pub fn recorder(&self) -> &Arc<HitRecorder> {
        &self.recorder
    }
}
