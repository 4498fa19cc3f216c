//! 配置值验证模块

use super::StaticConfig;
use crate::errors::{KvLinkerError, Result};

impl StaticConfig {
    /// 校验启动所需的配置值
    pub fn validate(&self) -> Result<()> {
        let generator = &self.generator;
        if generator.initial_length == 0 {
            return Err(KvLinkerError::config("generator.initial_length must be at least 1"));
        }
        if generator.max_trials == 0 {
            return Err(KvLinkerError::config("generator.max_trials must be at least 1"));
        }
        if generator.grow_after == 0 {
            return Err(KvLinkerError::config("generator.grow_after must be at least 1"));
        }
        if self.stats.queue_capacity == 0 {
            return Err(KvLinkerError::config("stats.queue_capacity must be at least 1"));
        }
        if self.database.path.trim().is_empty() {
            return Err(KvLinkerError::config("database.path must not be empty"));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(KvLinkerError::config(format!(
                "Invalid logging.format: '{}'. Valid: text, json",
                self.logging.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_trials_rejected() {
        let mut config = StaticConfig::default();
        config.generator.max_trials = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_initial_length_rejected() {
        let mut config = StaticConfig::default();
        config.generator.initial_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = StaticConfig::default();
        config.logging.format = "xml".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.message().contains("xml"));
    }

    #[test]
    fn test_empty_queue_rejected() {
        let mut config = StaticConfig::default();
        config.stats.queue_capacity = 0;
        assert!(config.validate().is_err());
    }
}
