//! # リポジトリ
//!
//! レコードストア契約と、その実装を提供する。
//!
//! ## 実装
//!
//! | 実装 | 用途 |
//! |------|------|
//! | [`DynamoDbMysfitRepository`] | 本番（Amazon DynamoDB / DynamoDB Local） |
//! | [`InMemoryMysfitRepository`] | ローカル開発・テスト |

pub mod in_memory_mysfit_repository;
pub mod mysfit_repository;

pub use in_memory_mysfit_repository::InMemoryMysfitRepository;
pub use mysfit_repository::{DynamoDbMysfitRepository, JsonPayload, MysfitRepository};
