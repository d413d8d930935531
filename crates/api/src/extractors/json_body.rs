//! JSON body extractor whose rejections use the API error format.

use axum::extract::FromRequest;

use crate::error::ApiError;

/// Like [`axum::Json`], but a body that fails to parse answers with a 400
/// `{error, message}` instead of axum's plain-text 422.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);
