//! receipt-scanner
//!
//! レシート画像を `/api/process-receipt` にアップロードし、解析結果を表示するCLI

pub mod cli;
pub mod config;
pub mod error;
pub mod offline;
pub mod terminal;
pub mod uploader;
