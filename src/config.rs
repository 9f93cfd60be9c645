use crate::error::{Result, ScannerError};
use receipt_common::{Locale, PROCESS_RECEIPT_PATH};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// エンドポイントを上書きする環境変数
pub const ENDPOINT_ENV: &str = "RECEIPT_SCANNER_ENDPOINT";

pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub locale: Locale,
    /// 未設定ならタイムアウトなし
    pub timeout_seconds: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            locale: Locale::default(),
            timeout_seconds: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
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
            .ok_or_else(|| ScannerError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("receipt-scanner").join("config.json"))
    }

    /// 引数 > 環境変数 > 設定ファイル の順で決める
    pub fn resolve_endpoint(&self, flag: Option<&str>) -> String {
        if let Some(endpoint) = flag.filter(|e| !e.trim().is_empty()) {
            return endpoint.to_string();
        }
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            if !endpoint.trim().is_empty() {
                return endpoint;
            }
        }
        self.endpoint.clone()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }
}

/// サーバーURLからアップロード先URLを組み立てる
///
/// 既にパスが付いていればそのまま使う
pub fn process_receipt_url(endpoint: &str) -> String {
    let base = endpoint.trim().trim_end_matches('/');
    if base.ends_with(PROCESS_RECEIPT_PATH) {
        base.to_string()
    } else {
        format!("{}{}", base, PROCESS_RECEIPT_PATH)
    }
}
