//! # Dependency Injection / 依赖注入模块
//!
//! ## Responsibilities / 职责
//!
//! - ✅ Create infra implementations (file store, simulated gateway) / 创建 infra 层具体实现
//! - ✅ Inject them into the signup wizard / 将依赖注入到注册向导
//!
//! ## Prohibited / 禁止事项
//!
//! ❌ **No business logic / 禁止包含任何业务逻辑**
//! ❌ **No configuration validation / 禁止做配置验证**
//!
//! > **This is the only place allowed to depend on th-infra and th-app simultaneously.**
//! > **这是唯一允许同时依赖 th-infra 和 th-app 的地方。**

use std::sync::Arc;

use th_app::SignupWizard;
use th_core::ports::{KeyValueStorePort, SignupGatewayPort};
use th_infra::{FileKeyValueStore, SimulatedSignupGateway};

use super::runtime::RuntimeSettings;

/// Key-value store backing the wizard snapshot.
pub fn create_store(settings: &RuntimeSettings) -> Arc<dyn KeyValueStorePort> {
    let store = FileKeyValueStore::with_defaults(settings.data_dir.clone());
    match settings.storage_quota_bytes {
        Some(quota) => Arc::new(store.with_quota(quota)),
        None => Arc::new(store),
    }
}

pub fn create_gateway(settings: &RuntimeSettings) -> Arc<dyn SignupGatewayPort> {
    Arc::new(SimulatedSignupGateway::new(settings.submission_delay))
}

/// Assemble a signup wizard session from resolved settings.
pub fn wire_signup_wizard(settings: &RuntimeSettings) -> SignupWizard {
    SignupWizard::new(
        create_store(settings),
        create_gateway(settings),
        settings.progress_key.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn settings(data_dir: PathBuf) -> RuntimeSettings {
        RuntimeSettings {
            data_dir,
            progress_key: "wizard".into(),
            submission_delay: Duration::ZERO,
            storage_quota_bytes: None,
        }
    }

    #[tokio::test]
    async fn test_wired_store_writes_under_data_dir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = create_store(&settings(temp_dir.path().to_path_buf()));

        store.set("wizard", "{}").await.unwrap();

        assert!(temp_dir.path().join("store").join("wizard.json").is_file());
    }

    #[tokio::test]
    async fn test_wired_store_applies_quota() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut settings = settings(temp_dir.path().to_path_buf());
        settings.storage_quota_bytes = Some(4);

        let store = create_store(&settings);

        assert!(store.set("wizard", "{}").await.is_err());
    }

    #[tokio::test]
    async fn test_wired_wizard_hydrates_empty_store() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let wizard = wire_signup_wizard(&settings(temp_dir.path().to_path_buf()));

        let report = wizard.hydrate().await;

        assert_eq!(report.view.step_index, 0);
        assert!(report.warnings.is_empty());
    }
}
