//! Short code assignment
//!
//! Finds an unused code for a target and persists the mapping. The whole
//! probe loop runs inside one read-write transaction while the code-length
//! cell is held exclusively, so concurrent callers never interleave a length
//! increment.

use std::sync::Arc;

use tracing::{debug, info, trace};

use crate::config::GeneratorConfig;
use crate::errors::{KvLinkerError, Result};
use crate::storage::keys::{self, CODE_LENGTH_KEY};
use crate::storage::{CodeLengthCell, KvRead, KvStore};
use crate::utils::{CodeGenerator, RandomCodeGenerator};

/// Retry budget and growth trigger for one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignPolicy {
    /// Candidates tried before giving up.
    pub max_trials: u32,
    /// Length grows by one whenever the iteration is a multiple of this.
    /// `0` never grows.
    pub grow_after: u32,
}

impl Default for AssignPolicy {
    fn default() -> Self {
        Self {
            max_trials: 80,
            grow_after: 50,
        }
    }
}

impl From<&GeneratorConfig> for AssignPolicy {
    fn from(config: &GeneratorConfig) -> Self {
        Self {
            max_trials: config.max_trials,
            grow_after: config.grow_after,
        }
    }
}

pub struct Registrar {
    store: Arc<KvStore>,
    length: CodeLengthCell,
    generator: Box<dyn CodeGenerator>,
    policy: AssignPolicy,
}

impl Registrar {
    pub fn new(store: Arc<KvStore>, length: CodeLengthCell, policy: AssignPolicy) -> Self {
        Self {
            store,
            length,
            generator: Box::new(RandomCodeGenerator),
            policy,
        }
    }

    /// Replace the candidate source (deterministic generators in tests).
    pub fn with_generator<G: CodeGenerator + 'static>(mut self, generator: G) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// 当前缓存的短码长度
    pub fn code_length(&self) -> u64 {
        self.length.get()
    }

    pub fn policy(&self) -> AssignPolicy {
        self.policy
    }

    /// Assign a fresh code to `target` and return it.
    ///
    /// The target is stored verbatim and must not be empty. On
    /// `GenerationExhausted` nothing is persisted, including a length
    /// increase made during this call.
    pub fn assign(&self, target: &str) -> Result<String> {
        if target.is_empty() {
            return Err(KvLinkerError::invalid_target("target URL is empty"));
        }

        let mut cached = self.length.lock();
        let start_length = *cached;

        let (code, length) = self
            .store
            .update(|txn| {
                let mut length = start_length;

                for iteration in 1..=self.policy.max_trials {
                    if iteration.checked_rem(self.policy.grow_after) == Some(0) {
                        length += 1;
                        txn.set_u64(CODE_LENGTH_KEY, length)
                            .map_err(|e| e.with_context("couldn't save code length"))?;
                        debug!(
                            "Growing code length to {} at iteration {}",
                            length, iteration
                        );
                    }

                    let code = self.generator.generate(length as usize);
                    let url_key = keys::url_key(&code);

                    if txn
                        .contains(&url_key)
                        .map_err(|e| e.with_context("couldn't query code for existence"))?
                    {
                        trace!("Collision on candidate {} (iteration {})", code, iteration);
                        continue;
                    }

                    txn.set_string(&url_key, target)
                        .map_err(|e| e.with_context("couldn't save mapping"))?;
                    trace!("Assigned {} after {} iteration(s)", code, iteration);
                    return Ok((code, length));
                }

                Err(KvLinkerError::generation_exhausted(format!(
                    "no free code found after {} attempts",
                    self.policy.max_trials
                )))
            })
            .map_err(|e| e.with_context("failed to save URL"))?;

        // 事务已提交，内存值与持久值保持一致
        if length != start_length {
            info!("Code length grown from {} to {}", start_length, length);
        }
        *cached = length;

        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// 始终返回同一个短码，并统计调用次数
    struct FixedGenerator {
        code: &'static str,
        calls: Arc<AtomicUsize>,
    }

    impl CodeGenerator for FixedGenerator {
        fn generate(&self, _length: usize) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.code.to_string()
        }
    }

    /// 记录每次请求的长度，对 `taken_len` 返回冲突码
    struct LengthRecorder {
        lengths: Arc<parking_lot::Mutex<Vec<usize>>>,
        taken_len: usize,
    }

    impl CodeGenerator for LengthRecorder {
        fn generate(&self, length: usize) -> String {
            self.lengths.lock().push(length);
            if length == self.taken_len {
                "a".repeat(length)
            } else {
                "b".repeat(length)
            }
        }
    }

    fn setup() -> (TempDir, Arc<KvStore>) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(KvStore::open(dir.path().join("registrar.redb")).unwrap());
        (dir, store)
    }

    fn persisted_length(store: &KvStore) -> Option<u64> {
        store
            .read(|txn| {
                Ok(txn
                    .get_raw(CODE_LENGTH_KEY)?
                    .map(|raw| crate::storage::codec::decode_u64(&raw))
                    .transpose()?)
            })
            .unwrap()
    }

    #[test]
    fn test_assign_stores_target_verbatim() {
        let (_dir, store) = setup();
        let registrar =
            Registrar::new(store.clone(), CodeLengthCell::new(4), AssignPolicy::default());

        let target = "  not even a url \u{1F600} ";
        let code = registrar.assign(target).unwrap();
        assert_eq!(code.len(), 4);

        let stored = store.read(|txn| txn.get_string(&keys::url_key(&code))).unwrap();
        assert_eq!(stored.as_deref(), Some(target));
    }

    #[test]
    fn test_assigned_codes_are_unique() {
        let (_dir, store) = setup();
        let registrar = Registrar::new(store, CodeLengthCell::new(4), AssignPolicy::default());

        let mut seen = HashSet::new();
        for i in 0..300 {
            let code = registrar.assign(&format!("https://example.com/{}", i)).unwrap();
            assert!(seen.insert(code), "duplicate code assigned");
        }
    }

    #[test]
    fn test_length_grows_exactly_once_at_threshold() {
        let (_dir, store) = setup();
        store
            .update(|txn| txn.set_string(&keys::url_key("aaaa"), "taken"))
            .unwrap();

        let lengths = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let registrar = Registrar::new(store.clone(), CodeLengthCell::new(4), AssignPolicy::default())
            .with_generator(LengthRecorder {
                lengths: lengths.clone(),
                taken_len: 4,
            });

        let code = registrar.assign("https://example.com").unwrap();
        assert_eq!(code, "bbbbb");
        assert_eq!(registrar.code_length(), 5);
        assert_eq!(persisted_length(&store), Some(5));

        let lengths = lengths.lock();
        // 前 49 次使用长度 4，第 50 次开始使用 5
        assert_eq!(lengths.len(), 50);
        assert!(lengths[..49].iter().all(|&l| l == 4));
        assert_eq!(lengths[49], 5);
    }

    #[test]
    fn test_exhaustion_tries_full_budget_and_rolls_back() {
        let (_dir, store) = setup();
        store
            .update(|txn| txn.set_string(&keys::url_key("zzzz"), "taken"))
            .unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let registrar = Registrar::new(store.clone(), CodeLengthCell::new(4), AssignPolicy::default())
            .with_generator(FixedGenerator {
                code: "zzzz",
                calls: calls.clone(),
            });

        let err = registrar.assign("https://example.com").unwrap_err();
        assert!(matches!(err, KvLinkerError::GenerationExhausted(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 80);

        // 长度变化随事务一起回滚
        assert_eq!(registrar.code_length(), 4);
        assert_eq!(persisted_length(&store), None);
        let original = store.read(|txn| txn.get_string(&keys::url_key("zzzz"))).unwrap();
        assert_eq!(original.as_deref(), Some("taken"));
    }

    #[test]
    fn test_custom_policy_budget() {
        let (_dir, store) = setup();
        store
            .update(|txn| txn.set_string(&keys::url_key("zzzz"), "taken"))
            .unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let policy = AssignPolicy {
            max_trials: 5,
            grow_after: 50,
        };
        let registrar = Registrar::new(store, CodeLengthCell::new(4), policy).with_generator(
            FixedGenerator {
                code: "zzzz",
                calls: calls.clone(),
            },
        );

        assert!(registrar.assign("x").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_growth_is_persisted_across_restart() {
        let (_dir, store) = setup();
        store
            .update(|txn| txn.set_string(&keys::url_key("aaaa"), "taken"))
            .unwrap();

        let registrar = Registrar::new(store.clone(), CodeLengthCell::new(4), AssignPolicy::default())
            .with_generator(LengthRecorder {
                lengths: Arc::new(parking_lot::Mutex::new(Vec::new())),
                taken_len: 4,
            });
        registrar.assign("https://example.com").unwrap();

        let reloaded = CodeLengthCell::load(&store, 4).unwrap();
        assert_eq!(reloaded.get(), 5);
    }

    #[test]
    fn test_zero_grow_after_never_grows() {
        let (_dir, store) = setup();
        store
            .update(|txn| txn.set_string(&keys::url_key("aaaa"), "taken"))
            .unwrap();

        let lengths = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let policy = AssignPolicy {
            max_trials: 60,
            grow_after: 0,
        };
        let registrar = Registrar::new(store.clone(), CodeLengthCell::new(4), policy)
            .with_generator(LengthRecorder {
                lengths: lengths.clone(),
                taken_len: 4,
            });

        let err = registrar.assign("https://example.com").unwrap_err();
        assert!(matches!(err, KvLinkerError::GenerationExhausted(_)));
        assert_eq!(lengths.lock().len(), 60);
        assert!(lengths.lock().iter().all(|&l| l == 4));
        assert_eq!(registrar.code_length(), 4);
        assert_eq!(persisted_length(&store), None);
    }

    #[test]
    fn test_empty_target_is_rejected() {
        let (_dir, store) = setup();
        let calls = Arc::new(AtomicUsize::new(0));
        let registrar = Registrar::new(store, CodeLengthCell::new(4), AssignPolicy::default())
            .with_generator(FixedGenerator {
                code: "abcd",
                calls: calls.clone(),
            });

        let err = registrar.assign("").unwrap_err();
        assert!(matches!(err, KvLinkerError::InvalidTarget(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
