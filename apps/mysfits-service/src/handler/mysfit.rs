//! # Mysfit ハンドラ
//!
//! Mysfit の閲覧・いいね・里親決定 API を提供する。
//!
//! ## エンドポイント
//!
//! - `GET /mysfits` - 一覧（`?filter=GoodEvil&value=Evil` で絞り込み）
//! - `GET /mysfits/{mysfit_id}` - 1 件取得
//! - `POST /mysfits/{mysfit_id}/like` - いいね数を 1 増やす
//! - `POST /mysfits/{mysfit_id}/adopt` - 里親決定済みにする
//!
//! ストアが返した JSON ペイロードは加工せずにそのままレスポンスボディにする。

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State, rejection::QueryRejection},
    http::header,
    response::{IntoResponse, Response},
};
use mysfits_domain::{DomainError, mysfit::MysfitId, query::MysfitQuery};
use mysfits_infra::{JsonPayload, MysfitRepository};
use serde::Deserialize;

use crate::error::MysfitsError;

/// Mysfit API の共有状態
pub struct MysfitState {
    pub repository: Arc<dyn MysfitRepository>,
}

/// 一覧取得のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct ListMysfitsParams {
    pub filter: Option<String>,
    pub value:  Option<String>,
}

/// ストアのペイロードを `application/json` として返す
fn json_response(payload: JsonPayload) -> Response {
    (
        [(header::CONTENT_TYPE, "application/json")],
        payload.into_bytes(),
    )
        .into_response()
}

/// GET /mysfits
///
/// `filter` と `value` が揃っていれば検索、どちらも無ければ全件を返す。
/// クエリ文字列自体が解釈できない場合（`filter` の重複など）も
/// バリデーションエラーとして Problem Details で返す。
#[tracing::instrument(skip_all)]
pub async fn list_mysfits(
    State(state): State<Arc<MysfitState>>,
    params: Result<Query<ListMysfitsParams>, QueryRejection>,
) -> Result<Response, MysfitsError> {
    let Query(params) =
        params.map_err(|rejection| DomainError::Validation(rejection.body_text()))?;
    tracing::debug!(filter = ?params.filter, value = ?params.value, "一覧を取得します");

    let payload = match MysfitQuery::from_params(params.filter, params.value)? {
        MysfitQuery::ListAll => state.repository.list_all().await?,
        MysfitQuery::FilterBy(filter) => state.repository.query(&filter).await?,
    };

    Ok(json_response(payload))
}

/// GET /mysfits/{mysfit_id}
#[tracing::instrument(skip_all, fields(%mysfit_id))]
pub async fn get_mysfit(
    State(state): State<Arc<MysfitState>>,
    Path(mysfit_id): Path<String>,
) -> Result<Response, MysfitsError> {
    let payload = state
        .repository
        .get_by_id(&MysfitId::new(mysfit_id))
        .await?;

    Ok(json_response(payload))
}

/// POST /mysfits/{mysfit_id}/like
///
/// リクエストボディは読まない。
#[tracing::instrument(skip_all, fields(%mysfit_id))]
pub async fn like_mysfit(
    State(state): State<Arc<MysfitState>>,
    Path(mysfit_id): Path<String>,
) -> Result<Response, MysfitsError> {
    let payload = state
        .repository
        .increment_like(&MysfitId::new(mysfit_id))
        .await?;
    tracing::info!("いいねを記録しました");

    Ok(json_response(payload))
}

/// POST /mysfits/{mysfit_id}/adopt
///
/// リクエストボディは読まない。
#[tracing::instrument(skip_all, fields(%mysfit_id))]
pub async fn adopt_mysfit(
    State(state): State<Arc<MysfitState>>,
    Path(mysfit_id): Path<String>,
) -> Result<Response, MysfitsError> {
    let payload = state
        .repository
        .mark_adopted(&MysfitId::new(mysfit_id))
        .await?;
    tracing::info!("里親決定を記録しました");

    Ok(json_response(payload))
}
