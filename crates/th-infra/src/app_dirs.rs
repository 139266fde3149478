use std::path::PathBuf;

const APP_DIR_NAME: &str = "tutorhub";

/// Environment variable selecting a separate data directory per profile.
pub const PROFILE_ENV: &str = "TH_PROFILE";

fn resolved_app_dir_name() -> String {
    match std::env::var(PROFILE_ENV) {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

/// Resolves the application data directory from the platform's local data dir.
pub struct DirsAppDirsAdapter {
    base_data_local_dir_override: Option<PathBuf>,
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_data_local_dir_override: None,
        }
    }

    /// Adapter that resolves under `base` instead of the system directory.
    pub fn with_base_data_local_dir(base: PathBuf) -> Self {
        Self {
            base_data_local_dir_override: Some(base),
        }
    }

    /// Returns the overridden base directory if set, otherwise `dirs::data_local_dir()`.
    pub fn base_data_local_dir(&self) -> Option<PathBuf> {
        if let Some(base) = &self.base_data_local_dir_override {
            return Some(base.clone());
        }
        dirs::data_local_dir()
    }

    /// Application data root: the base directory joined with `tutorhub[-<profile>]`.
    pub fn app_data_root(&self) -> anyhow::Result<PathBuf> {
        let base = self
            .base_data_local_dir()
            .ok_or_else(|| anyhow::anyhow!("local data directory is unavailable"))?;
        Ok(base.join(resolved_app_dir_name()))
    }
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}
