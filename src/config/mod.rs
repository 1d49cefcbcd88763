//! User settings stored as JSON under the application directory.

use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::core::utils::{app_data_dir, config_file_in, data_dir_in, ensure_dir};
use crate::errors::{FinanceError, FinanceResult};
use crate::persistence::{DEFAULT_AUTOSAVE_DELAY_MS, MAX_AUTOSAVE_DELAY_MS};

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Quiet period before pending changes are written.
    pub autosave_delay_ms: u64,
    /// `YYYY-MM-DD`; drives the age bracket. Absent means adult.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub currency: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            birth_date: None,
            data_dir: None,
            currency: "USD".into(),
        }
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> FinanceResult<Self> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> FinanceResult<Self> {
        ensure_dir(&base)?;
        let path = config_file_in(&base);
        Ok(Self { base, path })
    }

    pub fn load(&self) -> FinanceResult<AppConfig> {
        if !self.path.exists() {
            return Ok(AppConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: AppConfig = serde_json::from_str(&data).map_err(|err| {
            FinanceError::Config(format!("{} is not valid: {err}", self.path.display()))
        })?;
        check_autosave_delay(config.autosave_delay_ms)?;
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> FinanceResult<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// Where the key-value files live for `config`.
    pub fn data_dir(&self, config: &AppConfig) -> PathBuf {
        config
            .data_dir
            .clone()
            .unwrap_or_else(|| data_dir_in(&self.base))
    }
}

/// Rejects quiet periods longer than [`MAX_AUTOSAVE_DELAY_MS`].
pub fn check_autosave_delay(delay_ms: u64) -> FinanceResult<u64> {
    if delay_ms > MAX_AUTOSAVE_DELAY_MS {
        return Err(FinanceError::Config(format!(
            "autosave_delay_ms must be at most {MAX_AUTOSAVE_DELAY_MS}"
        )));
    }
    Ok(delay_ms)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> FinanceResult<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.autosave_delay_ms, 2_000);
        assert_eq!(manager.data_dir(&config), dir.path().join("data"));
    }

    #[test]
    fn save_then_load_keeps_fields() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = AppConfig {
            autosave_delay_ms: 500,
            birth_date: Some("2010-05-01".into()),
            ..AppConfig::default()
        };
        manager.save(&config).unwrap();
        assert!(!tmp_path(manager.path()).exists());
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(manager.path().parent().unwrap()).unwrap();
        fs::write(manager.path(), r#"{"birth_date":"2000-01-01"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.autosave_delay_ms, DEFAULT_AUTOSAVE_DELAY_MS);
        assert_eq!(config.currency, "USD");
    }

    #[test]
    fn oversized_autosave_delay_is_rejected() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(manager.path().parent().unwrap()).unwrap();
        fs::write(
            manager.path(),
            format!(r#"{{"autosave_delay_ms":{}}}"#, u64::MAX),
        )
        .unwrap();
        assert!(matches!(manager.load(), Err(FinanceError::Config(_))));
        assert_eq!(check_autosave_delay(MAX_AUTOSAVE_DELAY_MS).unwrap(), MAX_AUTOSAVE_DELAY_MS);
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        fs::create_dir_all(manager.path().parent().unwrap()).unwrap();
        fs::write(manager.path(), "{oops").unwrap();
        assert!(matches!(manager.load(), Err(FinanceError::Config(_))));
    }
}
