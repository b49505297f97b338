//! # Mythical Mysfits ドメイン層
//!
//! Mysfit レコードとその検索条件を表現する値オブジェクトを定義する。
//!
//! ## 設計方針
//!
//! - **値オブジェクト**: 生成時に検証し、不正な値の存在を型レベルで排除
//! - **タグ付きリクエスト型**: 一覧取得とフィルタ検索を [`query::MysfitQuery`] で明示的に区別
//! - **インフラ非依存**: DynamoDB やメモリストアの詳細には一切依存しない
//!
//! ## 依存関係の方向
//!
//! ```text
//! service → infra → domain
//!    ↘                ↑
//!      shared ────────┘（domain は shared に依存しない）
//! ```
//!
//! ## モジュール構成
//!
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`mysfit`] - Mysfit レコードとストアが返すペイロードの形状
//! - [`query`] - 一覧取得 / フィルタ検索のリクエスト型

#[macro_use]
mod macros;

pub mod error;
pub mod mysfit;
pub mod query;

pub use error::DomainError;
