//! # Mythical Mysfits インフラ層
//!
//! レコードストア（Mysfit テーブル）との接続・通信を担当する。
//!
//! ## 設計方針
//!
//! HTTP 層はストアの戻り値をパースせずにそのまま返す。そのため
//! ストア契約 [`MysfitRepository`] の各操作は、送信可能な
//! シリアライズ済み JSON（[`JsonPayload`]）を返す。
//!
//! ## 責務
//!
//! - **DynamoDB 接続**: クライアント生成、テーブル作成、シード投入
//! - **リポジトリ実装**: DynamoDB 実装とインメモリ実装
//! - **シードデータ**: 同梱のサンプル Mysfit
//!
//! ## 依存関係
//!
//! ```text
//! service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`dynamodb`] - DynamoDB クライアント生成とテーブル準備
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - ストア契約と実装
//! - [`seed`] - 同梱シードデータの読み込み
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use mysfits_infra::{dynamodb, repository::DynamoDbMysfitRepository};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = dynamodb::create_client(Some("http://localhost:8000"), "us-east-1").await;
//!     dynamodb::ensure_mysfits_table(&client, "MysfitsTable").await?;
//!     let repository = DynamoDbMysfitRepository::new(client, "MysfitsTable".to_string());
//!     Ok(())
//! }
//! ```

pub mod dynamodb;
pub mod error;
pub mod repository;
pub mod seed;

pub use error::{InfraError, InfraErrorKind};
pub use repository::{JsonPayload, MysfitRepository};
