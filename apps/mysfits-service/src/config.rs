//! # Mysfits Service 設定
//!
//! 環境変数から Mysfits Service サーバーの設定を読み込む。

use std::env;

use thiserror::Error;

/// レコードストアの実装
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreBackend {
    /// Amazon DynamoDB（本番）
    DynamoDb,
    /// プロセス内メモリ（ローカル開発・デモ）
    Memory,
}

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} の値が不正です: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Mysfits Service サーバーの設定
#[derive(Debug, Clone)]
pub struct MysfitsConfig {
    /// バインドアドレス
    pub host:              String,
    /// ポート番号
    pub port:              u16,
    /// レコードストアの実装
    pub store_backend:     StoreBackend,
    /// DynamoDB テーブル名
    pub table_name:        String,
    /// DynamoDB エンドポイント（DynamoDB Local 使用時に設定）
    pub dynamodb_endpoint: Option<String>,
    /// AWS リージョン
    pub aws_region:        String,
    /// 起動時にテーブル作成とシード投入を行うか
    pub bootstrap_table:   bool,
}

impl MysfitsConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の取得関数から設定を読み込む
    ///
    /// 空文字列は未設定として扱う。
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match get("MYSFITS_PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "MYSFITS_PORT",
                value,
            })?,
            None => 8080,
        };

        let store_backend = match get("MYSFITS_STORE_BACKEND") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: "MYSFITS_STORE_BACKEND",
                value,
            })?,
            None => StoreBackend::DynamoDb,
        };

        let bootstrap_table = match get("MYSFITS_BOOTSTRAP_TABLE") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidValue {
                name: "MYSFITS_BOOTSTRAP_TABLE",
                value,
            })?,
            None => false,
        };

        Ok(Self {
            host: get("MYSFITS_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            store_backend,
            table_name: get("MYSFITS_TABLE_NAME").unwrap_or_else(|| "MysfitsTable".to_string()),
            dynamodb_endpoint: get("DYNAMODB_ENDPOINT"),
            aws_region: get("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            bootstrap_table,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
