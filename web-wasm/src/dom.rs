//! ページ要素とDOM操作
//!
//! マークアップ側に次のIDの要素が必要:
//! `uploadForm`, `fileInput`, `fileLabel`, `submitBtn`, `statusMessage`, `resultContainer`

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, File, HtmlInputElement};
use receipt_common::{ReceiptFile, UploadView};

pub const UPLOAD_FORM_ID: &str = "uploadForm";
pub const FILE_INPUT_ID: &str = "fileInput";
pub const FILE_LABEL_ID: &str = "fileLabel";
pub const SUBMIT_BUTTON_ID: &str = "submitBtn";
pub const STATUS_MESSAGE_ID: &str = "statusMessage";
pub const RESULT_CONTAINER_ID: &str = "resultContainer";

/// ページ上の要素一式
#[derive(Debug, Clone)]
pub struct PageElements {
    pub form: Element,
    pub file_input: HtmlInputElement,
    pub file_label: Element,
    pub submit_button: Element,
    pub status_message: Element,
    pub result_container: Element,
}

impl PageElements {
    /// IDで要素を取得（見つからなければIDを含むエラー）
    pub fn lookup(document: &Document) -> Result<Self, JsValue> {
        let file_input: HtmlInputElement = element_by_id(document, FILE_INPUT_ID)?
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("#{} is not an <input> element", FILE_INPUT_ID)))?;

        Ok(Self {
            form: element_by_id(document, UPLOAD_FORM_ID)?,
            file_input,
            file_label: element_by_id(document, FILE_LABEL_ID)?,
            submit_button: element_by_id(document, SUBMIT_BUTTON_ID)?,
            status_message: element_by_id(document, STATUS_MESSAGE_ID)?,
            result_container: element_by_id(document, RESULT_CONTAINER_ID)?,
        })
    }

    /// 選択中の先頭ファイル
    pub fn selected_file(&self) -> Option<BrowserFile> {
        self.file_input
            .files()
            .and_then(|files| files.get(0))
            .map(BrowserFile)
    }
}

fn element_by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("element #{} not found", id)))
}

/// ブラウザで選択されたファイル
#[derive(Debug, Clone)]
pub struct BrowserFile(pub File);

impl BrowserFile {
    pub fn as_file(&self) -> &File {
        &self.0
    }
}

impl ReceiptFile for BrowserFile {
    fn file_name(&self) -> String {
        self.0.name()
    }
}

/// DOMへの表示
pub struct DomView {
    file_label: Element,
    submit_button: Element,
    status_message: Element,
    result_container: Element,
}

impl DomView {
    pub fn new(elements: &PageElements) -> Self {
        Self {
            file_label: elements.file_label.clone(),
            submit_button: elements.submit_button.clone(),
            status_message: elements.status_message.clone(),
            result_container: elements.result_container.clone(),
        }
    }
}

impl UploadView for DomView {
    fn set_label(&self, text: &str) {
        self.file_label.set_text_content(Some(text));
    }

    fn set_submit_enabled(&self, enabled: bool) {
        // <button> と <input type="submit"> のどちらでも効くよう属性で切り替える
        if let Err(e) = self.submit_button.toggle_attribute_with_force("disabled", !enabled) {
            web_sys::console::error_2(&JsValue::from_str("Failed to toggle submit button:"), &e);
        }
    }

    fn set_status(&self, text: &str) {
        self.status_message.set_text_content(Some(text));
    }

    fn set_result_html(&self, html: &str) {
        self.result_container.set_inner_html(html);
    }

    fn log_error(&self, message: &str) {
        web_sys::console::error_2(&JsValue::from_str("Network Error:"), &JsValue::from_str(message));
    }
}
