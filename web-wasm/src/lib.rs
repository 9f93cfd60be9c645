//! Receipt Upload Page (WASM)
//!
//! ページ側のマークアップにある要素へアップロード制御を結びつける

mod app;
mod api;
mod dom;

use wasm_bindgen::prelude::*;

// テストでは各テストが自前のページを組み立てる
#[cfg_attr(not(test), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    app::mount()
}
