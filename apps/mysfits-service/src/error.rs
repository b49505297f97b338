//! # Mysfits Service エラー定義
//!
//! Mysfits Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | 発生元 | ステータス |
//! |--------|-----------|
//! | クエリパラメータのバリデーション | 400 |
//! | ストアの `InvalidInput` | 400 |
//! | ストアの `NotFound` | 404 |
//! | ストアの `DynamoDb` | 503 |
//! | その他 | 500 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mysfits_domain::DomainError;
use mysfits_infra::{InfraError, InfraErrorKind};
use mysfits_shared::ErrorResponse;
use thiserror::Error;

/// Mysfits Service で発生するエラー
#[derive(Debug, Error)]
pub enum MysfitsError {
    /// リクエストの検証エラー
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// レコードストアのエラー
    #[error("レコードストアエラー: {0}")]
    Store(#[from] InfraError),
}

impl MysfitsError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            MysfitsError::Domain(DomainError::Validation(msg)) => {
                ErrorResponse::validation_error(msg.clone())
            }
            MysfitsError::Store(e) => match e.kind() {
                InfraErrorKind::NotFound { .. } => ErrorResponse::not_found(e.to_string()),
                InfraErrorKind::InvalidInput(msg) => ErrorResponse::bad_request(msg.clone()),
                InfraErrorKind::DynamoDb(_) => {
                    tracing::error!(error = %e, span_trace = %e.span_trace(), "レコードストアに到達できません");
                    ErrorResponse::service_unavailable("レコードストアが一時的に利用できません")
                }
                InfraErrorKind::Serialization(_) | InfraErrorKind::Unexpected(_) => {
                    tracing::error!(error = %e, span_trace = %e.span_trace(), "内部エラー");
                    ErrorResponse::internal_error()
                }
            },
        }
    }
}

impl IntoResponse for MysfitsError {
    fn into_response(self) -> Response {
        let body = self.to_error_response();
        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(
        MysfitsError::Domain(DomainError::Validation("filter がありません".to_string())),
        StatusCode::BAD_REQUEST
    )]
    #[case(
        MysfitsError::Store(InfraError::invalid_input("インデックスなし")),
        StatusCode::BAD_REQUEST
    )]
    #[case(
        MysfitsError::Store(InfraError::not_found("Mysfit", "123")),
        StatusCode::NOT_FOUND
    )]
    #[case(
        MysfitsError::Store(InfraError::dynamo_db("timeout")),
        StatusCode::SERVICE_UNAVAILABLE
    )]
    #[case(
        MysfitsError::Store(InfraError::unexpected("lock")),
        StatusCode::INTERNAL_SERVER_ERROR
    )]
    fn test_エラー種別ごとのステータスコード(
        #[case] error: MysfitsError,
        #[case] expected: StatusCode,
    ) {
        let response = error.into_response();

        assert_eq!(response.status(), expected);
    }

    #[test]
    fn test_内部エラーの詳細はレスポンスに含めない() {
        let error = MysfitsError::Store(InfraError::unexpected("secret-table-name"));

        let body = error.to_error_response();

        assert_eq!(body.detail, "内部エラーが発生しました");
    }

    #[test]
    fn test_not_foundの詳細にidが含まれる() {
        let error = MysfitsError::Store(InfraError::not_found("Mysfit", "abc"));

        let body = error.to_error_response();

        assert_eq!(body.status, 404);
        assert!(body.detail.contains("abc"));
    }
}
