//! レシート関連の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - ServerResponse: `/api/process-receipt` のレスポンス
//! - ReceiptData: data 内に埋め込まれたレシートJSON
//! - Item: 購入品目

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// サーバーレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerResponse {
    /// null・0・空文字列なども false 扱い
    #[serde(deserialize_with = "truthy")]
    pub success: bool,
    /// JSON文書を含む文字列（```json フェンス付きの場合あり）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// JSの真偽判定と同じ規則でboolに変換
fn truthy<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    })
}

/// 型検証しないJSON値
///
/// AIの出力なので文字列・数値どちらも来る。表示時にそのまま文字列化する。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValue(pub Value);

impl FieldValue {
    /// 値なし扱いか（null または空文字列）
    pub fn is_missing(&self) -> bool {
        match &self.0 {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_value(f, &self.0)
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => Ok(()),
        Value::Bool(b) => write!(f, "{}", b),
        Value::String(s) => f.write_str(s),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                write!(f, "{}", i)
            } else if let Some(u) = n.as_u64() {
                write!(f, "{}", u)
            } else {
                // f64のDisplayは 100.0 を "100" と出す
                write!(f, "{}", n.as_f64().unwrap_or_default())
            }
        }
        Value::Array(values) => {
            for (i, v) in values.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write_value(f, v)?;
            }
            Ok(())
        }
        Value::Object(_) => write!(f, "{}", value),
    }
}

/// 値があれば文字列化、無ければプレースホルダ
pub fn display_or(value: Option<&FieldValue>, placeholder: &str) -> String {
    match value {
        Some(v) if !v.is_missing() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

/// レシート解析結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptData {
    pub date: Option<FieldValue>,
    pub total_amount: Option<FieldValue>,
    #[serde(deserialize_with = "lenient_items")]
    pub items: Option<Vec<Item>>,
}

impl ReceiptData {
    /// 任意のJSON値から変換
    ///
    /// オブジェクト以外（配列・数値など）は空のレシートとして扱う
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// 表示対象の品目（空なら None）
    pub fn listed_items(&self) -> Option<&[Item]> {
        self.items.as_deref().filter(|items| !items.is_empty())
    }
}

/// 購入品目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub name: Option<FieldValue>,
    pub quantity: Option<FieldValue>,
    pub price: Option<FieldValue>,
    pub category: Option<FieldValue>,
}

/// 配列以外の items は品目なし、オブジェクト以外の要素は空の品目
fn lenient_items<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Item>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(values)) => Some(
            values
                .into_iter()
                .map(|v| serde_json::from_value(v).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}
