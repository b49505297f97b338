//! # シードデータ
//!
//! リポジトリに同梱したサンプル Mysfit（`data/mysfits.json`）を読み込む。
//! インメモリストアの初期データと、DynamoDB テーブルの初期投入に使う。

use mysfits_domain::mysfit::{Mysfit, MysfitList};

use crate::InfraError;

const SEED_JSON: &str = include_str!("../data/mysfits.json");

/// 同梱のシードデータを読み込む
pub fn load_seed_mysfits() -> Result<Vec<Mysfit>, InfraError> {
    let list: MysfitList = serde_json::from_str(SEED_JSON)?;
    Ok(list.mysfits)
}
