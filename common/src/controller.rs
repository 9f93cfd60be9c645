//! アップロードコントローラ
//!
//! ファイル選択 → 送信 → レスポンス表示の一連の流れを管理する。
//! 画面操作（`UploadView`）と通信（`ReceiptUploader`）は外から注入するので、
//! ブラウザ（DOM + fetch）でもCLI（端末 + reqwest）でも同じ制御を使える。
//!
//! 状態遷移: idle → submitting → (success | error) → idle

use std::cell::RefCell;

use crate::error::{Error, Result};
use crate::messages::Messages;
use crate::parser::{interpret_response, Interpreted};
use crate::render::render_receipt_html;
use crate::types::{ReceiptData, ServerResponse};

/// 画面側の操作
pub trait UploadView {
    /// ファイル名ラベル
    fn set_label(&self, text: &str);

    /// 送信ボタンの有効/無効
    fn set_submit_enabled(&self, enabled: bool);

    /// ステータスメッセージ
    fn set_status(&self, text: &str);

    /// 結果エリアのHTML（空文字列でクリア）
    fn set_result_html(&self, html: &str);

    /// 診断ログ（通信エラー時のみ呼ばれる）
    fn log_error(&self, _message: &str) {}
}

/// 選択されたファイル
pub trait ReceiptFile: Clone {
    fn file_name(&self) -> String;
}

/// `/api/process-receipt` へのアップロード
///
/// ブラウザ側のFutureは `Send` ではないので `async fn` のまま使う
#[allow(async_fn_in_trait)]
pub trait ReceiptUploader {
    type File: ReceiptFile;

    /// `file` フィールドにファイルを入れたマルチパートをPOSTし、JSONをデコード
    ///
    /// 通信失敗・JSONでないレスポンスは `Error::Transport`
    async fn upload(&self, file: &Self::File) -> Result<ServerResponse>;
}

/// 送信結果
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// ファイル未選択（通信なし）
    NoFileSelected,
    /// 送信中のため無視
    InFlight,
    /// 表示成功
    Processed(ReceiptData),
    /// success=false
    Rejected(String),
    /// 埋め込みJSONが無い・壊れている
    MalformedPayload(String),
    /// 通信失敗
    TransportFailed(String),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmitOutcome::Processed(_))
    }
}

/// アップロード状態
#[derive(Debug)]
struct UploadState<F> {
    selected_file: Option<F>,
    is_submitting: bool,
}

impl<F> Default for UploadState<F> {
    fn default() -> Self {
        Self {
            selected_file: None,
            is_submitting: false,
        }
    }
}

/// 送信中フラグの解除
///
/// Futureが途中で破棄されても送信ボタンを有効に戻す
struct InFlightGuard<'a, V: UploadView, F> {
    view: &'a V,
    state: &'a RefCell<UploadState<F>>,
}

impl<V: UploadView, F> Drop for InFlightGuard<'_, V, F> {
    fn drop(&mut self) {
        self.state.borrow_mut().is_submitting = false;
        self.view.set_submit_enabled(true);
    }
}

/// アップロードコントローラ
pub struct UploadController<V, U: ReceiptUploader> {
    view: V,
    uploader: U,
    messages: &'static Messages,
    state: RefCell<UploadState<U::File>>,
}

impl<V, U> UploadController<V, U>
where
    V: UploadView,
    U: ReceiptUploader,
{
    pub fn new(view: V, uploader: U, messages: &'static Messages) -> Self {
        Self {
            view,
            uploader,
            messages,
            state: RefCell::new(UploadState::default()),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn uploader(&self) -> &U {
        &self.uploader
    }

    pub fn messages(&self) -> &'static Messages {
        self.messages
    }

    pub fn is_submitting(&self) -> bool {
        self.state.borrow().is_submitting
    }

    /// ファイル選択の変更
    pub fn select_file(&self, file: Option<U::File>) {
        match &file {
            Some(f) => {
                self.view.set_label(&f.file_name());
                self.view.set_submit_enabled(true);
            }
            None => {
                self.view.set_label(self.messages.choose_file);
                self.view.set_submit_enabled(false);
            }
        }
        self.state.borrow_mut().selected_file = file;
    }

    /// フォーム送信
    ///
    /// 送信ボタンは成功・失敗にかかわらず最後に必ず有効に戻す
    pub async fn submit(&self) -> SubmitOutcome {
        let file = {
            let state = self.state.borrow();
            let Some(file) = state.selected_file.clone() else {
                drop(state);
                self.view.set_status(self.messages.select_file_first);
                return SubmitOutcome::NoFileSelected;
            };
            if state.is_submitting {
                return SubmitOutcome::InFlight;
            }
            file
        };

        self.view.set_status(self.messages.processing);
        self.view.set_result_html("");
        self.view.set_submit_enabled(false);
        self.state.borrow_mut().is_submitting = true;
        let _in_flight = InFlightGuard {
            view: &self.view,
            state: &self.state,
        };

        match self.uploader.upload(&file).await {
            Ok(response) => self.handle_response(&response),
            Err(e) => self.handle_transport_error(&e),
        }
    }

    /// サーバーレスポンスを画面に反映
    pub fn handle_response(&self, response: &ServerResponse) -> SubmitOutcome {
        match interpret_response(response) {
            Ok(Interpreted::Receipt(receipt)) => {
                self.view.set_status(self.messages.success);
                self.view
                    .set_result_html(&render_receipt_html(&receipt, self.messages));
                SubmitOutcome::Processed(receipt)
            }
            Ok(Interpreted::Rejected(error)) => {
                self.view.set_status(&self.messages.application_error(error));
                self.view.set_result_html("");
                let detail = error.filter(|e| !e.is_empty()).unwrap_or(self.messages.unknown_error);
                SubmitOutcome::Rejected(detail.to_string())
            }
            Err(e) => {
                let detail = e.to_string();
                self.view.set_status(&self.messages.payload_error(&detail));
                self.view.set_result_html("");
                SubmitOutcome::MalformedPayload(detail)
            }
        }
    }

    fn handle_transport_error(&self, error: &Error) -> SubmitOutcome {
        let detail = error.to_string();
        self.view.set_status(&self.messages.network_error(&detail));
        self.view.log_error(&detail);
        SubmitOutcome::TransportFailed(detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::Locale;
    use crate::types::FieldValue;
    use futures::executor::block_on;
    use serde_json::json;
    use std::cell::Cell;
    use std::future::Future;
    use std::pin::Pin;
    use std::rc::Rc;
    use std::task::{Context, Poll};

    // =============================================
    // テスト用フェイク
    // =============================================

    #[derive(Debug, Default)]
    struct Screen {
        label: String,
        submit_enabled: bool,
        status: String,
        result_html: String,
        logged: Vec<String>,
        enable_history: Vec<bool>,
    }

    #[derive(Clone, Default)]
    struct FakeView(Rc<RefCell<Screen>>);

    impl UploadView for FakeView {
        fn set_label(&self, text: &str) {
            self.0.borrow_mut().label = text.to_string();
        }
        fn set_submit_enabled(&self, enabled: bool) {
            let mut screen = self.0.borrow_mut();
            screen.submit_enabled = enabled;
            screen.enable_history.push(enabled);
        }
        fn set_status(&self, text: &str) {
            self.0.borrow_mut().status = text.to_string();
        }
        fn set_result_html(&self, html: &str) {
            self.0.borrow_mut().result_html = html.to_string();
        }
        fn log_error(&self, message: &str) {
            self.0.borrow_mut().logged.push(message.to_string());
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    struct FakeFile(&'static str);

    impl ReceiptFile for FakeFile {
        fn file_name(&self) -> String {
            self.0.to_string()
        }
    }

    /// 1回だけPendingを返す
    struct YieldOnce(bool);

    impl Future for YieldOnce {
        type Output = ();
        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    struct FakeUploader {
        reply: std::result::Result<serde_json::Value, &'static str>,
        calls: Cell<usize>,
        uploaded: RefCell<Vec<FakeFile>>,
        yield_first: bool,
        hang: Cell<bool>,
    }

    impl FakeUploader {
        fn replying(value: serde_json::Value) -> Self {
            Self {
                reply: Ok(value),
                calls: Cell::new(0),
                uploaded: RefCell::new(Vec::new()),
                yield_first: false,
                hang: Cell::new(false),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                reply: Err(message),
                ..Self::replying(json!({}))
            }
        }
    }

    impl ReceiptUploader for FakeUploader {
        type File = FakeFile;

        async fn upload(&self, file: &FakeFile) -> Result<ServerResponse> {
            self.calls.set(self.calls.get() + 1);
            self.uploaded.borrow_mut().push(file.clone());
            if self.yield_first {
                YieldOnce(false).await;
            }
            if self.hang.get() {
                futures::future::pending::<()>().await;
            }
            match &self.reply {
                Ok(value) => serde_json::from_value(value.clone())
                    .map_err(|e| Error::Transport(e.to_string())),
                Err(message) => Err(Error::Transport(message.to_string())),
            }
        }
    }

    fn controller(uploader: FakeUploader) -> (UploadController<FakeView, FakeUploader>, FakeView) {
        let view = FakeView::default();
        (UploadController::new(view.clone(), uploader, Locale::Ru.messages()), view)
    }

    // =============================================
    // ファイル選択
    // =============================================

    #[test]
    fn test_select_file_updates_label() {
        let (ctrl, view) = controller(FakeUploader::replying(json!({})));
        ctrl.select_file(Some(FakeFile("receipt.jpg")));

        let screen = view.0.borrow();
        assert_eq!(screen.label, "receipt.jpg");
        assert!(screen.submit_enabled);
    }

    #[test]
    fn test_clear_selection_resets_label() {
        let (ctrl, view) = controller(FakeUploader::replying(json!({})));
        ctrl.select_file(Some(FakeFile("receipt.jpg")));
        ctrl.select_file(None);

        let screen = view.0.borrow();
        assert_eq!(screen.label, "Выберите файл");
        assert!(!screen.submit_enabled);
        assert!(screen.status.is_empty());
    }

    // =============================================
    // 送信
    // =============================================

    #[test]
    fn test_submit_without_file() {
        let (ctrl, view) = controller(FakeUploader::replying(json!({"success": true})));
        let outcome = block_on(ctrl.submit());

        assert_eq!(outcome, SubmitOutcome::NoFileSelected);
        assert_eq!(ctrl.uploader().calls.get(), 0);
        let screen = view.0.borrow();
        assert_eq!(screen.status, "Пожалуйста, выберите файл.");
        assert!(screen.enable_history.is_empty());
    }

    #[test]
    fn test_submit_success_fenced() {
        let data = "```json\n{\"date\":\"2024-01-01\",\"total_amount\":100,\"items\":[{\"name\":\"Bread\",\"quantity\":2,\"price\":50,\"category\":\"Food\"}]}\n```";
        let (ctrl, view) = controller(FakeUploader::replying(json!({"success": true, "data": data})));
        ctrl.select_file(Some(FakeFile("receipt.jpg")));

        let outcome = block_on(ctrl.submit());
        assert!(outcome.is_success());
        assert_eq!(*ctrl.uploader().uploaded.borrow(), vec![FakeFile("receipt.jpg")]);

        let screen = view.0.borrow();
        assert_eq!(screen.status, "✅ Чек успешно обработан!");
        assert!(screen.result_html.contains("<strong>Дата:</strong> 2024-01-01"));
        assert!(screen.result_html.contains("<strong>Общая сумма:</strong> 100"));
        assert_eq!(screen.result_html.matches("<li class=\"item-entry\">").count(), 1);
        let order: Vec<usize> = ["Bread", "2</p>", "50</p>", "Food"]
            .iter()
            .map(|s| screen.result_html.find(s).unwrap())
            .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(screen.submit_enabled);
        assert_eq!(screen.enable_history, vec![true, false, true]);
    }

    #[test]
    fn test_submit_success_without_items() {
        let (ctrl, view) = controller(FakeUploader::replying(
            json!({"success": true, "data": "{\"date\":\"2024-01-01\"}"}),
        ));
        ctrl.select_file(Some(FakeFile("receipt.jpg")));

        match block_on(ctrl.submit()) {
            SubmitOutcome::Processed(receipt) => {
                assert_eq!(receipt.date, Some(FieldValue(json!("2024-01-01"))));
            }
            other => panic!("unexpected: {:?}", other),
        }
        let screen = view.0.borrow();
        assert!(screen.result_html.contains("<strong>Общая сумма:</strong> Неизвестно"));
        assert!(screen.result_html.contains("Список покупок не найден."));
    }

    #[test]
    fn test_submit_rejected_with_error() {
        let (ctrl, view) = controller(FakeUploader::replying(json!({"success": false, "error": "bad image"})));
        ctrl.select_file(Some(FakeFile("receipt.jpg")));

        let outcome = block_on(ctrl.submit());
        assert_eq!(outcome, SubmitOutcome::Rejected("bad image".into()));
        let screen = view.0.borrow();
        assert!(screen.status.contains("bad image"));
        assert!(screen.result_html.is_empty());
        assert!(screen.submit_enabled);
        assert!(screen.logged.is_empty());
    }

    #[test]
    fn test_submit_rejected_without_error() {
        let (ctrl, view) = controller(FakeUploader::replying(json!({"success": false})));
        ctrl.select_file(Some(FakeFile("receipt.jpg")));

        block_on(ctrl.submit());
        assert!(view.0.borrow().status.contains("Неизвестная ошибка"));
    }

    #[test]
    fn test_submit_rejected_success_absent() {
        let (ctrl, view) = controller(FakeUploader::replying(json!({"error": "No file part"})));
        ctrl.select_file(Some(FakeFile("receipt.jpg")));

        let outcome = block_on(ctrl.submit());
        assert_eq!(outcome, SubmitOutcome::Rejected("No file part".into()));
        assert_eq!(view.0.borrow().status, "❌ Ошибка: No file part");
    }

    #[test]
    fn test_submit_transport_failure() {
        let (ctrl, view) = controller(FakeUploader::failing("connection refused"));
        ctrl.select_file(Some(FakeFile("receipt.jpg")));

        let outcome = block_on(ctrl.submit());
        assert_eq!(outcome, SubmitOutcome::TransportFailed("connection refused".into()));
        let screen = view.0.borrow();
        assert_eq!(screen.status, "❌ Ошибка сети: connection refused");
        assert_eq!(screen.logged, vec!["connection refused".to_string()]);
        assert!(screen.submit_enabled);
        assert!(!ctrl.is_submitting());
    }

    #[test]
    fn test_submit_malformed_payload() {
        let (ctrl, view) = controller(FakeUploader::replying(
            json!({"success": true, "data": "```json\n{\"date\": \n```"}),
        ));
        ctrl.select_file(Some(FakeFile("receipt.jpg")));

        let outcome = block_on(ctrl.submit());
        assert!(matches!(outcome, SubmitOutcome::MalformedPayload(_)));
        let screen = view.0.borrow();
        assert!(screen.status.starts_with("❌ Ошибка: не удалось разобрать данные чека: "));
        assert!(screen.result_html.is_empty());
        assert!(screen.submit_enabled);
    }

    #[test]
    fn test_submit_missing_payload() {
        let (ctrl, _view) = controller(FakeUploader::replying(json!({"success": true})));
        ctrl.select_file(Some(FakeFile("receipt.jpg")));

        let outcome = block_on(ctrl.submit());
        assert!(matches!(outcome, SubmitOutcome::MalformedPayload(_)));
    }

    #[test]
    fn test_submit_clears_previous_result() {
        let (ctrl, view) = controller(FakeUploader::failing("offline"));
        ctrl.select_file(Some(FakeFile("receipt.jpg")));
        view.0.borrow_mut().result_html = "<p>old</p>".into();

        block_on(ctrl.submit());
        assert!(view.0.borrow().result_html.is_empty());
    }

    #[test]
    fn test_submit_while_in_flight() {
        let mut uploader = FakeUploader::replying(json!({"success": false, "error": "x"}));
        uploader.yield_first = true;
        let (ctrl, _view) = controller(uploader);
        ctrl.select_file(Some(FakeFile("receipt.jpg")));

        let (first, second) = block_on(futures::future::join(ctrl.submit(), ctrl.submit()));
        assert_eq!(first, SubmitOutcome::Rejected("x".into()));
        assert_eq!(second, SubmitOutcome::InFlight);
        assert_eq!(ctrl.uploader().calls.get(), 1);
        assert!(!ctrl.is_submitting());
    }

    #[test]
    fn test_dropped_submit_releases_button() {
        let uploader = FakeUploader::replying(json!({"success": false, "error": "x"}));
        uploader.hang.set(true);
        let (ctrl, view) = controller(uploader);
        ctrl.select_file(Some(FakeFile("receipt.jpg")));

        {
            let mut pending = Box::pin(ctrl.submit());
            let waker = futures::task::noop_waker();
            let mut cx = Context::from_waker(&waker);
            assert!(pending.as_mut().poll(&mut cx).is_pending());
            assert!(ctrl.is_submitting());
        }

        assert!(!ctrl.is_submitting());
        assert_eq!(view.0.borrow().enable_history, vec![true, false, true]);

        ctrl.uploader().hang.set(false);
        let outcome = block_on(ctrl.submit());
        assert_eq!(outcome, SubmitOutcome::Rejected("x".into()));
        assert_eq!(ctrl.uploader().calls.get(), 2);
    }

    #[test]
    fn test_submit_twice_sequentially() {
        let (ctrl, view) = controller(FakeUploader::replying(json!({"success": true, "data": "{}"})));
        ctrl.select_file(Some(FakeFile("receipt.jpg")));

        block_on(ctrl.submit());
        let first = view.0.borrow().result_html.clone();
        block_on(ctrl.submit());
        assert_eq!(view.0.borrow().result_html, first);
        assert_eq!(ctrl.uploader().calls.get(), 2);
    }
}
