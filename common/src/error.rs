//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 通信失敗（接続拒否、JSONでないレスポンスなど）
    #[error("{0}")]
    Transport(String),

    /// success=true なのに data が無い
    #[error("response has no data field")]
    MissingPayload,

    /// data 内のJSONが壊れている
    #[error("{0}")]
    Payload(#[from] serde_json::Error),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
