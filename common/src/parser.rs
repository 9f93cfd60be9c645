//! サーバーレスポンスパーサー
//!
//! data 文字列からフェンス（```json ... ```）を除去し、
//! 埋め込まれたレシートJSONをパースする

use crate::error::{Error, Result};
use crate::types::{ReceiptData, ServerResponse};

const FENCE: &str = "```";

/// フェンス直後に付く言語タグ（改行込み）
const FENCE_TAGS: [&str; 2] = ["json\n", "json\r\n"];

/// フェンスマーカーを除去して前後の空白をトリム
///
/// 左から走査し、``` の直後が `json\n` ならタグごと、
/// そうでなければ ``` だけを取り除く。位置は問わない。
///
/// # Examples
/// ```
/// use receipt_common::strip_fences;
///
/// assert_eq!(strip_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
/// assert_eq!(strip_fences("  {}  "), "{}");
/// ```
pub fn strip_fences(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(pos) = rest.find(FENCE) {
        cleaned.push_str(&rest[..pos]);
        let after = &rest[pos + FENCE.len()..];
        rest = FENCE_TAGS
            .iter()
            .find_map(|tag| after.strip_prefix(tag))
            .unwrap_or(after);
    }
    cleaned.push_str(rest);

    cleaned.trim().to_string()
}

/// 埋め込みレシートJSONをパース
///
/// # Returns
/// * `Ok(ReceiptData)` - パース成功（オブジェクト以外は空のレシート）
/// * `Err(Error::Payload)` - JSONとして不正
pub fn parse_receipt(raw: &str) -> Result<ReceiptData> {
    let cleaned = strip_fences(raw);
    let value: serde_json::Value = serde_json::from_str(&cleaned)?;
    Ok(ReceiptData::from_value(value))
}

/// レスポンスの解釈結果
#[derive(Debug, Clone, PartialEq)]
pub enum Interpreted<'a> {
    /// success=true かつ data のパース成功
    Receipt(ReceiptData),
    /// success=false（サーバーのエラーメッセージ付き）
    Rejected(Option<&'a str>),
}

/// サーバーレスポンスを解釈
///
/// success=true で data が無い、または壊れている場合は `Err`
pub fn interpret_response(response: &ServerResponse) -> Result<Interpreted<'_>> {
    if !response.success {
        return Ok(Interpreted::Rejected(response.error.as_deref()));
    }

    let data = response.data.as_deref().ok_or(Error::MissingPayload)?;
    parse_receipt(data).map(Interpreted::Receipt)
}
