//! TOML 設定。
//!
//! `~/.config/ux-healthcheck/config.toml` に置く。無ければ既定値。
//! `UX_HEALTHCHECK_ENV=dev` で開発用ディレクトリに切り替わる。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreDisplay {
    #[default]
    Raw,
    Percentage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub score: ScoreDisplay,
    /// 選択肢に "3 points" などの補足を出すか
    #[serde(default = "default_true")]
    pub option_detail: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            score: ScoreDisplay::default(),
            option_detail: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 回答の保存先。未指定なら設定ディレクトリ。
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_true() -> bool {
    true
}

impl Config {
    /// 既定の場所から読み込む
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir()?.join("config.toml"))
    }

    /// ファイルが無ければ既定値を返す。壊れていればエラー。
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// 回答の保存ディレクトリ
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => config_dir(),
        }
    }
}

/// `~/.config/ux-healthcheck[-dev]/`
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::home_dir().ok_or(Error::DataDir)?.join(".config");
    let env = std::env::var("UX_HEALTHCHECK_ENV").unwrap_or_default();
    Ok(if env == "dev" {
        base.join("ux-healthcheck-dev")
    } else {
        base.join("ux-healthcheck")
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.display.score, ScoreDisplay::Raw);
        assert!(config.display.option_detail);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\nscore = \"percentage\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.display.score, ScoreDisplay::Percentage);
        assert!(config.display.option_detail);
        assert_eq!(config.storage.data_dir, None);
    }

    #[test]
    fn test_data_dir_override() {
        let config: Config = toml::from_str("[storage]\ndata_dir = \"/tmp/answers\"\n").unwrap();
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/answers"));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\nscore = \"fancy\"\n").unwrap();
        assert!(matches!(Config::load_from(&path), Err(Error::Toml(_))));
    }
}
