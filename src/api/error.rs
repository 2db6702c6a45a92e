use crate::application::LibraryApplicationError;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーと、リクエストの抽出失敗をHTTPレスポンスへ
/// マッピングする。レスポンスは常に `{"error": "<message>"}` の形をとる。
#[derive(Debug)]
pub enum ApiError {
    Application(LibraryApplicationError),
    BadRequest(String),
    NotFound(String),
}

impl From<LibraryApplicationError> for ApiError {
    fn from(err: LibraryApplicationError) -> Self {
        ApiError::Application(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!("Path rejected: {}", rejection.body_text());
        ApiError::NotFound("Not found".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Application(err) => match err {
                // 400 Bad Request - 入力不正・ビジネスルール違反
                e @ (LibraryApplicationError::Validation(_)
                | LibraryApplicationError::BookUnavailable
                | LibraryApplicationError::AlreadyReturned
                | LibraryApplicationError::AlreadyPaid) => {
                    (StatusCode::BAD_REQUEST, e.to_string())
                }

                // 404 Not Found - リクエストされたリソースが存在しない
                e @ (LibraryApplicationError::BookNotFound
                | LibraryApplicationError::BorrowingNotFound
                | LibraryApplicationError::PaymentNotFound) => {
                    (StatusCode::NOT_FOUND, e.to_string())
                }

                // 500 Internal Server Error - システム障害
                // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
                e @ (LibraryApplicationError::DomainError(_)
                | LibraryApplicationError::BookRepositoryError(_)
                | LibraryApplicationError::BorrowingRepositoryError(_)
                | LibraryApplicationError::PaymentRepositoryError(_)) => {
                    tracing::error!(
                        error.cause_chain = ?e,
                        error.message = %e,
                        "Unexpected error happened"
                    );
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "An unexpected error occurred".to_string(),
                    )
                }
            },
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
