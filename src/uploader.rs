//! reqwest によるマルチパートアップロード

use crate::error::{Result, ScannerError};
use receipt_common::{Error, ReceiptFile, ReceiptUploader, ServerResponse, FILE_FIELD};
use reqwest::multipart::{Form, Part};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// アップロード対象のローカルファイル
#[derive(Debug, Clone, PartialEq)]
pub struct LocalFile {
    pub path: PathBuf,
    pub name: String,
}

impl LocalFile {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ScannerError::FileNotFound(path.display().to_string()));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            name,
        })
    }

    /// 拡張子からMIMEタイプを推定
    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "heic" => "image/heic",
            "pdf" => "application/pdf",
            _ => "application/octet-stream",
        }
    }
}

impl ReceiptFile for LocalFile {
    fn file_name(&self) -> String {
        self.name.clone()
    }
}

/// `/api/process-receipt` へのHTTPアップローダ
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: reqwest::Client,
    url: String,
}

impl HttpUploader {
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn send(&self, file: &LocalFile) -> Result<ServerResponse> {
        let bytes = tokio::fs::read(&file.path).await?;
        debug!(url = %self.url, file = %file.name, size = bytes.len(), "uploading receipt");

        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(file.mime_type())?;
        let form = Form::new().part(FILE_FIELD, part);

        let response = self.client.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "received response");

        // 400/500でも本文の {success, error} を使う
        serde_json::from_str(&body).map_err(|e| ScannerError::InvalidResponse {
            status: status.as_u16(),
            detail: e.to_string(),
        })
    }
}

impl ReceiptUploader for HttpUploader {
    type File = LocalFile;

    async fn upload(&self, file: &LocalFile) -> receipt_common::Result<ServerResponse> {
        self.send(file)
            .await
            .map_err(|e| Error::Transport(describe(&e)))
    }
}

/// エラーの原因を連結したメッセージ
///
/// reqwest のDisplayには "connection refused" などの原因が出ないため
fn describe(error: &ScannerError) -> String {
    let mut message = error.to_string();
    // 直下のsourceは `#[error("...{0}")]` で既にmessageに含まれる
    let mut source = std::error::Error::source(error).and_then(|s| s.source());
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
