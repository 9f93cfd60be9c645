//! レシート表示
//!
//! 結果エリアに入れるHTMLと、CLI向けのプレーンテキストを生成する。
//! どちらも入力だけで決まる純粋関数。

use crate::messages::Messages;
use crate::types::{display_or, FieldValue, Item, ReceiptData};

type Accessor = fn(&Item) -> Option<&FieldValue>;

fn item_name(item: &Item) -> Option<&FieldValue> {
    item.name.as_ref()
}

fn item_quantity(item: &Item) -> Option<&FieldValue> {
    item.quantity.as_ref()
}

fn item_price(item: &Item) -> Option<&FieldValue> {
    item.price.as_ref()
}

fn item_category(item: &Item) -> Option<&FieldValue> {
    item.category.as_ref()
}

/// 品目の表示項目（固定順）
fn item_fields(messages: &Messages) -> [(&'static str, Accessor); 4] {
    [
        (messages.item_name_label, item_name),
        (messages.item_quantity_label, item_quantity),
        (messages.item_price_label, item_price),
        (messages.item_category_label, item_category),
    ]
}

/// HTML特殊文字をエスケープ
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn labeled_paragraph(label: &str, value: &str) -> String {
    format!(
        "<p><strong>{}:</strong> {}</p>",
        escape_html(label),
        escape_html(value)
    )
}

/// 結果エリア用HTMLを生成
///
/// 見出し・日付・合計の後に品目リスト（無ければ「見つかりません」）を続ける
pub fn render_receipt_html(receipt: &ReceiptData, messages: &Messages) -> String {
    let mut html = String::new();

    html.push_str(&format!("<h2>{}</h2>", escape_html(messages.heading)));
    html.push_str(&labeled_paragraph(
        messages.date_label,
        &display_or(receipt.date.as_ref(), messages.unknown),
    ));
    html.push_str(&labeled_paragraph(
        messages.total_label,
        &display_or(receipt.total_amount.as_ref(), messages.unknown),
    ));

    match receipt.listed_items() {
        Some(items) => {
            let fields = item_fields(messages);
            html.push_str("<ul class=\"items-list\">");
            for item in items {
                html.push_str("<li class=\"item-entry\">");
                for (label, get) in &fields {
                    html.push_str(&labeled_paragraph(label, &display_or(get(item), messages.unknown)));
                }
                html.push_str("</li>");
            }
            html.push_str("</ul>");
        }
        None => {
            html.push_str(&format!("<p>{}</p>", escape_html(messages.no_items)));
        }
    }

    html
}

/// CLI向けプレーンテキストを生成
pub fn render_receipt_text(receipt: &ReceiptData, messages: &Messages) -> String {
    let mut lines = vec![
        messages.heading.to_string(),
        format!("{}: {}", messages.date_label, display_or(receipt.date.as_ref(), messages.unknown)),
        format!(
            "{}: {}",
            messages.total_label,
            display_or(receipt.total_amount.as_ref(), messages.unknown)
        ),
        String::new(),
    ];

    match receipt.listed_items() {
        Some(items) => {
            let fields = item_fields(messages);
            for item in items {
                for (i, (label, get)) in fields.iter().enumerate() {
                    let bullet = if i == 0 { "- " } else { "  " };
                    lines.push(format!("{}{}: {}", bullet, label, display_or(get(item), messages.unknown)));
                }
            }
        }
        None => lines.push(messages.no_items.to_string()),
    }

    let mut text = lines.join("\n");
    text.push('\n');
    text
}
