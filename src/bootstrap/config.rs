//! # Configuration Loader / 配置加载器
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Read TOML configuration files / 读取 TOML 配置文件
//! - ✅ Parse TOML into AppConfig DTO / 将 TOML 解析为 AppConfig DTO
//! - ✅ Report I/O and parsing errors with context / 报告带上下文的 I/O 和解析错误
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//! ❌ **No default value logic / 禁止默认值逻辑**
//!
//! Defaults are filled in by [`super::runtime::RuntimeSettings::resolve`].

use anyhow::Context;
use std::path::{Path, PathBuf};
use th_core::config::AppConfig;

/// File name looked up in the data directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// Empty strings and missing sections are accepted as they are.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Load `config_path` if given, otherwise `<data_root>/config.toml` when present.
///
/// A missing default file yields an empty config; an explicit path must exist.
pub fn load_config_or_empty(
    config_path: Option<PathBuf>,
    data_root: &Path,
) -> anyhow::Result<AppConfig> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            let default_path = data_root.join(CONFIG_FILE_NAME);
            if default_path.is_file() {
                load_config(default_path)
            } else {
                Ok(AppConfig::empty())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Test that valid TOML is parsed correctly
    /// 测试有效 TOML 被正确解析
    #[test]
    fn test_load_config_reads_valid_toml() {
        let toml_content = r#"
            [storage]
            data_dir = "/srv/tutorhub"
            progress_key = "wizard"
            quota_bytes = 4096

            [submission]
            delay_ms = 250
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let config_path = temp_file.path().to_path_buf();

        let config = load_config(config_path).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/tutorhub"));
        assert_eq!(config.progress_key, "wizard");
        assert_eq!(config.storage_quota_bytes, 4096);
        assert_eq!(config.submission_delay_ms, 250);
    }

    /// Test that missing values result in empty/default values
    /// 测试缺失的值导致空/默认值
    #[test]
    fn test_load_config_returns_empty_values_when_missing() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[storage]\n[submission]\n").unwrap();

        let config = load_config(temp_file.path().to_path_buf()).unwrap();

        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn test_load_config_rejects_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[storage\n").unwrap();

        let err = load_config(temp_file.path().to_path_buf()).unwrap_err();

        assert!(err.to_string().contains("TOML"), "got: {err}");
    }

    /// Test that non-existent files return IO error
    /// 测试不存在的文件返回 IO 错误
    #[test]
    fn test_load_config_returns_io_error_on_file_not_found() {
        let non_existent_path = PathBuf::from("/this/path/does/not/exist/config.toml");

        let err = load_config(non_existent_path).unwrap_err();

        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_or_empty_without_default_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();

        let config = load_config_or_empty(None, temp_dir.path()).unwrap();

        assert_eq!(config, AppConfig::empty());
    }

    #[test]
    fn test_load_config_or_empty_reads_default_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "[submission]\ndelay_ms = 10\n",
        )
        .unwrap();

        let config = load_config_or_empty(None, temp_dir.path()).unwrap();

        assert_eq!(config.submission_delay_ms, 10);
    }
}
