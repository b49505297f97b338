//! # Mysfits Service アプリケーション構築
//!
//! ルーターとミドルウェアの構築を担当する。
//! `main.rs` は設定読み込み・ストア初期化・サーバー起動に集中する。
//!
//! ## レイヤー構成（外側から）
//!
//! 1. `CorsLayer`: 任意オリジンを許可（プリフライトもここで応答）
//! 2. `SetRequestIdLayer`: `X-Request-Id` が無ければ UUID v7 を採番
//! 3. `TraceLayer`: Request ID 付きのリクエストスパン
//! 4. `PropagateRequestIdLayer`: レスポンスに `X-Request-Id` を複写

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use mysfits_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::handler::{
    MysfitState,
    adopt_mysfit,
    get_mysfit,
    health_check,
    like_mysfit,
    list_mysfits,
};

/// CORS 設定
///
/// ブラウザ上の静的サイトから任意オリジンで呼び出される。
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// ルーターを構築する
pub fn build_app(state: Arc<MysfitState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/mysfits", get(list_mysfits))
        .route("/mysfits/{mysfit_id}", get(get_mysfit))
        .route("/mysfits/{mysfit_id}/like", post(like_mysfit))
        .route("/mysfits/{mysfit_id}/adopt", post(adopt_mysfit))
        .with_state(state)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(cors_layer())
}
