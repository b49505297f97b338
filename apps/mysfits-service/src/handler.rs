//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、レコードの読み書きはストアに委譲

pub mod health;
pub mod mysfit;

pub use health::health_check;
pub use mysfit::{
    ListMysfitsParams,
    MysfitState,
    adopt_mysfit,
    get_mysfit,
    like_mysfit,
    list_mysfits,
};
