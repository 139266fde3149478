//! Runtime settings resolved from the configuration DTO.
//!
//! This is the one place where empty configuration values are replaced with
//! defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use th_core::config::AppConfig;

/// Storage key of the wizard snapshot when none is configured.
pub const DEFAULT_PROGRESS_KEY: &str = "tutorhub.signup.progress";

/// Simulated backend round trip when none is configured.
pub const DEFAULT_SUBMISSION_DELAY: Duration = Duration::from_millis(800);

const LOGS_DIR: &str = "logs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeSettings {
    pub data_dir: PathBuf,
    pub progress_key: String,
    pub submission_delay: Duration,
    pub storage_quota_bytes: Option<usize>,
}

impl RuntimeSettings {
    /// Fill in defaults for every empty value of `config`.
    ///
    /// `app_data_root` is used when no data directory is configured.
    pub fn resolve(config: &AppConfig, app_data_root: &Path) -> Self {
        let data_dir = if config.data_dir.as_os_str().is_empty() {
            app_data_root.to_path_buf()
        } else {
            config.data_dir.clone()
        };

        let progress_key = match config.progress_key.trim() {
            "" => DEFAULT_PROGRESS_KEY.to_string(),
            key => key.to_string(),
        };

        let submission_delay = match config.submission_delay_ms {
            0 => DEFAULT_SUBMISSION_DELAY,
            ms => Duration::from_millis(ms),
        };

        let storage_quota_bytes = match config.storage_quota_bytes {
            0 => None,
            bytes => Some(usize::try_from(bytes).unwrap_or(usize::MAX)),
        };

        Self {
            data_dir,
            progress_key,
            submission_delay,
            storage_quota_bytes,
        }
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join(LOGS_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_resolves_to_defaults() {
        let settings = RuntimeSettings::resolve(&AppConfig::empty(), Path::new("/data/tutorhub"));

        assert_eq!(settings.data_dir, PathBuf::from("/data/tutorhub"));
        assert_eq!(settings.progress_key, DEFAULT_PROGRESS_KEY);
        assert_eq!(settings.submission_delay, DEFAULT_SUBMISSION_DELAY);
        assert_eq!(settings.storage_quota_bytes, None);
        assert_eq!(settings.logs_dir(), PathBuf::from("/data/tutorhub/logs"));
    }

    #[test]
    fn configured_values_win() {
        let config = AppConfig {
            data_dir: PathBuf::from("/srv/th"),
            progress_key: "wizard".into(),
            submission_delay_ms: 5,
            storage_quota_bytes: 1024,
        };

        let settings = RuntimeSettings::resolve(&config, Path::new("/unused"));

        assert_eq!(settings.data_dir, PathBuf::from("/srv/th"));
        assert_eq!(settings.progress_key, "wizard");
        assert_eq!(settings.submission_delay, Duration::from_millis(5));
        assert_eq!(settings.storage_quota_bytes, Some(1024));
    }
}
