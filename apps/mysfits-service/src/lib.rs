//! # Mysfits Service ライブラリ
//!
//! Mythical Mysfits の閲覧・いいね・里親決定を提供する HTTP API サーバーのコアモジュール。
//!
//! ## モジュール構成
//!
//! - `app_builder`: ルーターとミドルウェアの構築
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラーと HTTP レスポンスへの変換
//! - `handler`: HTTP ハンドラ

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
