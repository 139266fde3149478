//! # Pure Data Module / 纯数据模块 - Data Transfer Objects Only
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Define configuration data structures / 定义配置数据结构
//! - ✅ Provide TOML → DTO mapping / 提供 TOML → DTO 的映射
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No validation logic / 禁止验证逻辑**
//! ❌ **No default value calculation / 禁止默认值计算**
//!
//! Defaults (data directory, snapshot key) are resolved by the binary's
//! bootstrap, not here.

use std::path::PathBuf;

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding the file-backed store (may be empty - a fact, not an error)
    pub data_dir: PathBuf,

    /// Key the wizard snapshot is stored under (may be empty)
    pub progress_key: String,

    /// Simulated round-trip delay of the submission gateway, in milliseconds
    pub submission_delay_ms: u64,

    /// Byte quota of the key-value store, 0 when unlimited
    pub storage_quota_bytes: u64,
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// **Prohibited / 禁止**: no validation or default value logic here.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(Self {
            data_dir: PathBuf::from(
                toml_value
                    .get("storage")
                    .and_then(|s| s.get("data_dir"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(""),
            ),
            progress_key: toml_value
                .get("storage")
                .and_then(|s| s.get("progress_key"))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            submission_delay_ms: toml_value
                .get("submission")
                .and_then(|s| s.get("delay_ms"))
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
                .max(0) as u64,
            storage_quota_bytes: toml_value
                .get("storage")
                .and_then(|s| s.get("quota_bytes"))
                .and_then(|v| v.as_integer())
                .unwrap_or(0)
                .max(0) as u64,
        })
    }

    /// Create empty AppConfig (all empty/default values)
    /// 创建空的 AppConfig（所有字段为空/默认值）
    pub fn empty() -> Self {
        Self {
            data_dir: PathBuf::new(),
            progress_key: String::new(),
            submission_delay_ms: 0,
            storage_quota_bytes: 0,
        }
    }
}
