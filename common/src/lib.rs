//! Receipt Common Library
//!
//! CLIとWeb(WASM)で共有されるアップロード制御・型・レンダリング

pub mod types;
pub mod error;
pub mod messages;
pub mod parser;
pub mod render;
pub mod controller;

pub use types::{FieldValue, Item, ReceiptData, ServerResponse};
pub use error::{Error, Result};
pub use messages::{Locale, Messages};
pub use parser::{interpret_response, parse_receipt, strip_fences, Interpreted};
pub use render::{render_receipt_html, render_receipt_text};
pub use controller::{ReceiptFile, ReceiptUploader, SubmitOutcome, UploadController, UploadView};

/// アップロード先のエンドポイントパス
pub const PROCESS_RECEIPT_PATH: &str = "/api/process-receipt";

/// マルチパートのファイルフィールド名
pub const FILE_FIELD: &str = "file";
