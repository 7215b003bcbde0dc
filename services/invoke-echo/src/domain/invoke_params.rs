/// 呼び出しパラメータ
///
/// Lambdaランタイムが受信したペイロードから構築される4フィールドのレコード。
/// 各フィールドは不透明な文字列として扱い、検証や解釈は行わない。
use std::fmt;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// JSONキー（シリアライズ順）
const FIELDS: [&str; 4] = ["Action", "Schema", "Table", "Data"];

/// Lambda呼び出しイベント
///
/// JSONキーはPascalCase（`Action`, `Schema`, `Table`, `Data`）で出力する。
/// 入力側のキー照合はASCIIの大文字小文字を区別しない（`action`や`SCHEMA`も受け付ける）。
/// - 完全一致のキーは大文字小文字違いのキーより優先する
/// - 未知のキーは無視する
/// - 欠落したキーと`null`は空文字として扱う
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InvokeParams {
    /// 操作種別
    pub action: String,
    /// スキーマ名
    pub schema: String,
    /// テーブル名
    pub table: String,
    /// 任意のデータ（JSON文字列など）
    pub data: String,
}

impl InvokeParams {
    /// 4フィールドを指定してInvokeParamsを作成
    pub fn new(
        action: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            schema: schema.into(),
            table: table.into(),
            data: data.into(),
        }
    }

    /// 正規化されたJSON文字列にシリアライズ
    ///
    /// キー順は常に`Action`, `Schema`, `Table`, `Data`で、空白を含まない。
    /// 同じフィールド値からは常にバイト単位で同一の文字列が得られる。
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<'de> Deserialize<'de> for InvokeParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(InvokeParamsVisitor)
    }
}

struct InvokeParamsVisitor;

impl<'de> Visitor<'de> for InvokeParamsVisitor {
    type Value = InvokeParams;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object with Action, Schema, Table and Data string fields")
    }

    fn visit_map<A>(self, mut map: A) -> Result<InvokeParams, A::Error>
    where
        A: MapAccess<'de>,
    {
        // フィールドごとの (値, 完全一致かどうか)
        let mut values: [Option<(String, bool)>; 4] = Default::default();

        while let Some(key) = map.next_key::<String>()? {
            let Some(index) = FIELDS.iter().position(|f| f.eq_ignore_ascii_case(&key)) else {
                map.next_value::<IgnoredAny>()?;
                continue;
            };
            let exact = FIELDS[index] == key;

            // nullは値を持たないキーとして扱い、既存の値を上書きしない
            let Some(value) = map.next_value::<Option<String>>()? else {
                continue;
            };

            match &values[index] {
                Some((_, true)) if !exact => {}
                _ => values[index] = Some((value, exact)),
            }
        }

        let [action, schema, table, data] =
            values.map(|slot| slot.map(|(value, _)| value).unwrap_or_default());

        Ok(InvokeParams {
            action,
            schema,
            table,
            data,
        })
    }

    fn visit_unit<E>(self) -> Result<InvokeParams, E>
    where
        E: de::Error,
    {
        Ok(InvokeParams::default())
    }
}
