//! ページへの組み込み
//!
//! 要素を取得し、change / submit イベントをコントローラに接続する

use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;
use receipt_common::{Locale, UploadController};

use crate::api::receipt::FetchUploader;
use crate::dom::{DomView, PageElements};

pub type ReceiptController = UploadController<DomView, FetchUploader>;

/// `<html lang>` から表示言語を決める
fn page_locale(document: &Document) -> Locale {
    document
        .document_element()
        .and_then(|root| root.get_attribute("lang"))
        .map(|tag| Locale::from_tag(&tag))
        .unwrap_or_default()
}

pub fn mount() -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document is not available"))?;

    let elements = PageElements::lookup(&document)?;
    let messages = page_locale(&document).messages();
    let controller: Rc<ReceiptController> = Rc::new(UploadController::new(
        DomView::new(&elements),
        FetchUploader::default(),
        messages,
    ));

    // ファイル選択
    {
        let page = elements.clone();
        let controller = controller.clone();
        EventListener::new(&elements.file_input, "change", move |_| {
            controller.select_file(page.selected_file());
        })
        .forget();
    }

    // フォーム送信（ページ遷移は常に抑止）
    EventListener::new_with_options(
        &elements.form,
        "submit",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            event.prevent_default();
            let controller = controller.clone();
            spawn_local(async move {
                controller.submit().await;
            });
        },
    )
    .forget();

    Ok(())
}
