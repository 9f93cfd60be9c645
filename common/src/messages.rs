//! 画面表示メッセージ
//!
//! ロシア語が既定。英語は `<html lang="en">` や `--lang en` で選択する。

use serde::{Deserialize, Serialize};

/// 表示言語
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    /// BCP 47 タグから判定（"en", "en-US" → En、それ以外 → Ru）
    pub fn from_tag(tag: &str) -> Self {
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        if primary.eq_ignore_ascii_case("en") {
            Locale::En
        } else {
            Locale::Ru
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }

    pub fn messages(&self) -> &'static Messages {
        match self {
            Locale::Ru => &RU,
            Locale::En => &EN,
        }
    }
}

/// メッセージテーブル
#[derive(Debug)]
pub struct Messages {
    pub choose_file: &'static str,
    pub select_file_first: &'static str,
    pub processing: &'static str,
    pub success: &'static str,
    pub error_prefix: &'static str,
    pub network_error_prefix: &'static str,
    pub unknown_error: &'static str,
    pub malformed_payload: &'static str,
    pub heading: &'static str,
    pub date_label: &'static str,
    pub total_label: &'static str,
    pub item_name_label: &'static str,
    pub item_quantity_label: &'static str,
    pub item_price_label: &'static str,
    pub item_category_label: &'static str,
    pub no_items: &'static str,
    pub unknown: &'static str,
}

pub static RU: Messages = Messages {
    choose_file: "Выберите файл",
    select_file_first: "Пожалуйста, выберите файл.",
    processing: "Обрабатываю чек, пожалуйста, подождите...",
    success: "✅ Чек успешно обработан!",
    error_prefix: "❌ Ошибка: ",
    network_error_prefix: "❌ Ошибка сети: ",
    unknown_error: "Неизвестная ошибка",
    malformed_payload: "не удалось разобрать данные чека",
    heading: "🧾 Результаты анализа",
    date_label: "Дата",
    total_label: "Общая сумма",
    item_name_label: "Покупка",
    item_quantity_label: "Количество",
    item_price_label: "Цена",
    item_category_label: "Категория",
    no_items: "Список покупок не найден.",
    unknown: "Неизвестно",
};

pub static EN: Messages = Messages {
    choose_file: "Choose a file",
    select_file_first: "Please select a file.",
    processing: "Processing the receipt, please wait...",
    success: "✅ Receipt processed successfully!",
    error_prefix: "❌ Error: ",
    network_error_prefix: "❌ Network error: ",
    unknown_error: "Unknown error",
    malformed_payload: "could not parse receipt data",
    heading: "🧾 Analysis results",
    date_label: "Date",
    total_label: "Total amount",
    item_name_label: "Purchase",
    item_quantity_label: "Quantity",
    item_price_label: "Price",
    item_category_label: "Category",
    no_items: "No purchases found.",
    unknown: "Unknown",
};

impl Messages {
    /// サーバーが返したエラー（空なら汎用メッセージ）
    pub fn application_error(&self, error: Option<&str>) -> String {
        let detail = error.filter(|e| !e.is_empty()).unwrap_or(self.unknown_error);
        format!("{}{}", self.error_prefix, detail)
    }

    pub fn network_error(&self, detail: &str) -> String {
        format!("{}{}", self.network_error_prefix, detail)
    }

    pub fn payload_error(&self, detail: &str) -> String {
        format!("{}{}: {}", self.error_prefix, self.malformed_payload, detail)
    }
}
