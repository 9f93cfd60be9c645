use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("HTTP通信エラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSONでないレスポンス (HTTP {status}): {detail}")]
    InvalidResponse { status: u16, detail: String },

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("レシートを処理できませんでした: {0}")]
    NotProcessed(String),
}

impl ScannerError {
    /// 終了時に表示するメッセージ
    ///
    /// NotProcessed のステータスは既に表示済みなので None
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::NotProcessed(_) => None,
            other => Some(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScannerError>;
