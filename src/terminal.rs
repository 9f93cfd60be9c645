//! 端末への表示
//!
//! ステータスは標準エラー、結果は標準出力かファイルに出す

use crate::cli::OutputFormat;
use crate::error::{Result, ScannerError};
use indicatif::{ProgressBar, ProgressStyle};
use receipt_common::{render_receipt_text, Messages, SubmitOutcome, UploadView};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::time::Duration;
use tracing::error;

pub struct TerminalView {
    show_progress: bool,
    spinner: RefCell<Option<ProgressBar>>,
    label: RefCell<String>,
    status: RefCell<String>,
    result_html: RefCell<String>,
    submit_enabled: Cell<bool>,
}

impl TerminalView {
    /// `show_progress` が偽ならスピナーを出さない（パイプ・テスト用）
    pub fn new(show_progress: bool) -> Self {
        Self {
            show_progress,
            spinner: RefCell::new(None),
            label: RefCell::new(String::new()),
            status: RefCell::new(String::new()),
            result_html: RefCell::new(String::new()),
            submit_enabled: Cell::new(false),
        }
    }

    pub fn label(&self) -> String {
        self.label.borrow().clone()
    }

    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    pub fn result_html(&self) -> String {
        self.result_html.borrow().clone()
    }

    pub fn submit_enabled(&self) -> bool {
        self.submit_enabled.get()
    }

    fn start_spinner(&self) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(self.label());
        spinner.enable_steady_tick(Duration::from_millis(100));
        *self.spinner.borrow_mut() = Some(spinner);
    }
}

impl UploadView for TerminalView {
    fn set_label(&self, text: &str) {
        *self.label.borrow_mut() = text.to_string();
    }

    fn set_submit_enabled(&self, enabled: bool) {
        self.submit_enabled.set(enabled);
        if enabled {
            if let Some(spinner) = self.spinner.borrow_mut().take() {
                spinner.finish_and_clear();
            }
        } else if self.show_progress {
            self.start_spinner();
        }
    }

    fn set_status(&self, text: &str) {
        *self.status.borrow_mut() = text.to_string();
        match self.spinner.borrow().as_ref() {
            Some(spinner) => spinner.println(text),
            None => eprintln!("{}", text),
        }
    }

    fn set_result_html(&self, html: &str) {
        *self.result_html.borrow_mut() = html.to_string();
    }

    fn log_error(&self, message: &str) {
        error!(%message, "network error");
    }
}

/// 送信結果を出力する
///
/// 表示できなかった場合はステータスを含むエラーを返す
pub fn write_outcome(
    outcome: &SubmitOutcome,
    view: &TerminalView,
    format: OutputFormat,
    output: Option<&Path>,
    messages: &Messages,
) -> Result<()> {
    let SubmitOutcome::Processed(receipt) = outcome else {
        return Err(ScannerError::NotProcessed(view.status()));
    };

    let rendered = match format {
        OutputFormat::Html => {
            let mut html = view.result_html();
            html.push('\n');
            html
        }
        OutputFormat::Text => render_receipt_text(receipt, messages),
    };

    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            eprintln!("✔ {}", path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(())
}
