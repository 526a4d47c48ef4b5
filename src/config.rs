use crate::error::{ClassifierError, Result};
use serde::{Deserialize, Serialize};
use site_classifier_common::typo::DEFAULT_CACHE_CAPACITY;
use std::path::{Path, PathBuf};

pub const DEFAULT_TEXT_COLUMN: &str = "Concat_site_variables";
pub const DEFAULT_TRINOMIAL_COLUMN: &str = "trinomial";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 診断的遺物辞書（JSON）
    pub artifact_db: Option<PathBuf>,
    /// 専門家データセット（CSV / JSON）
    pub expert_dataset: Option<PathBuf>,
    /// 語彙の上書きファイル（JSON）
    pub vocabulary: Option<PathBuf>,
    pub text_column: String,
    pub trinomial_column: String,
    pub typo_cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            artifact_db: None,
            expert_dataset: None,
            vocabulary: None,
            text_column: DEFAULT_TEXT_COLUMN.into(),
            trinomial_column: DEFAULT_TRINOMIAL_COLUMN.into(),
            typo_cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// 指定パスから読み込み（無ければ既定値）
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// 読めなければ警告して既定値
    pub fn load_or_default() -> Self {
        match Self::config_path() {
            Ok(path) => Self::load_from_or_default(&path),
            Err(e) => {
                tracing::warn!("{}, using default config", e);
                Self::default()
            }
        }
    }

    pub fn load_from_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            tracing::warn!("failed to load {}: {}, using default config", path.display(), e);
            Self::default()
        })
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ClassifierError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home
            .join(".config")
            .join("site-classifier")
            .join("config.json"))
    }
}
