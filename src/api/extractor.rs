use axum::extract::{FromRequest, FromRequestParts};

use super::error::ApiError;

// axum 標準の抽出器をラップし、失敗時も JSON のエラーレスポンスを返す

/// JSONボディ（不正なJSONは400）
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// クエリ文字列（不正な値は400）
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// パスパラメータ（IDとして解釈できなければ404）
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct PathId<T>(pub T);
