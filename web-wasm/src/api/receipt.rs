//! `/api/process-receipt` 連携
//!
//! FormData に `file` を入れて fetch でPOSTし、JSONレスポンスをデコードする

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, Request, RequestInit, Response};
use receipt_common::{Error, ReceiptUploader, ServerResponse, FILE_FIELD, PROCESS_RECEIPT_PATH};

use crate::dom::BrowserFile;

/// fetch によるアップローダ
#[derive(Debug, Clone)]
pub struct FetchUploader {
    endpoint: String,
}

impl Default for FetchUploader {
    fn default() -> Self {
        Self::new(PROCESS_RECEIPT_PATH)
    }
}

impl FetchUploader {
    /// `endpoint` はページのオリジンからの相対パスでもよい
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    async fn post(&self, file: &BrowserFile) -> Result<ServerResponse, JsValue> {
        let form = FormData::new()?;
        form.append_with_blob(FILE_FIELD, file.as_file())?;

        // Content-Type はブラウザがboundary付きで設定する
        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_body(&form);

        let request = Request::new_with_str_and_init(&self.endpoint, &opts)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window is not available"))?;
        let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
        let resp: Response = resp_value.dyn_into()?;

        // エラーステータスでも本文の {success, error} を使う
        let json = JsFuture::from(resp.json()?).await?;
        let response: ServerResponse = serde_wasm_bindgen::from_value(json)?;
        Ok(response)
    }
}

impl ReceiptUploader for FetchUploader {
    type File = BrowserFile;

    async fn upload(&self, file: &BrowserFile) -> receipt_common::Result<ServerResponse> {
        self.post(file)
            .await
            .map_err(|e| Error::Transport(js_error_message(&e)))
    }
}

/// JSの例外値からメッセージを取り出す
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}
