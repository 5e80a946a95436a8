//! Request body extraction with the API's validation semantics.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use super::ApiError;
use crate::constants::messages;

/// JSON body extractor that reports every problem as a 400 [`ApiError`].
///
/// A request without a JSON content type, or with an empty body, is read as
/// `{}` so that handlers answer with their own "required" message. Input
/// types mark their fields `lenient`, so a mistyped value reaches the service
/// as `None`; a target without that still fails here with the required-field
/// message.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json") || ct.contains("+json"));

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::validation(e.body_text()))?;

        let body: &[u8] = if is_json && !bytes.iter().all(u8::is_ascii_whitespace) {
            &bytes
        } else {
            b"{}"
        };

        serde_json::from_slice(body)
            .map(Self)
            .map_err(|e| match e.classify() {
                Category::Data => ApiError::validation(messages::ALL_FIELDS_REQUIRED),
                Category::Io | Category::Syntax | Category::Eof => {
                    ApiError::validation(format!("Malformed JSON body: {e}"))
                }
            })
    }
}
