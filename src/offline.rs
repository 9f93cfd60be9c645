//! 保存済みレスポンスの再表示
//!
//! 通信の代わりにファイルの内容をレスポンスとして返すアップローダ

use receipt_common::{ReceiptUploader, ServerResponse};

use crate::uploader::LocalFile;

/// 保存済みのレスポンス
#[derive(Debug, Clone)]
pub struct SavedResponse {
    response: ServerResponse,
}

impl SavedResponse {
    /// `{success, data, error}` 形式ならそのまま、それ以外はdata部分とみなす
    pub fn parse(content: &str) -> Self {
        let response = serde_json::from_str::<serde_json::Value>(content)
            .ok()
            .filter(|v| v.get("success").is_some())
            .and_then(|v| serde_json::from_value::<ServerResponse>(v).ok())
            .unwrap_or_else(|| ServerResponse {
                success: true,
                data: Some(content.to_string()),
                error: None,
            });
        Self { response }
    }

    pub fn response(&self) -> &ServerResponse {
        &self.response
    }
}

impl ReceiptUploader for SavedResponse {
    type File = LocalFile;

    async fn upload(&self, _file: &LocalFile) -> receipt_common::Result<ServerResponse> {
        Ok(self.response.clone())
    }
}
