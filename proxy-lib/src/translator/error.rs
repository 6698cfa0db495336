use crate::{constants::TEXT_PLAIN_CONTENT_TYPE, resolver::ResolverError};
use axum::{
  http::{header, StatusCode},
  response::{IntoResponse, Response},
};
use thiserror::Error;

pub(super) type TranslateResult<T> = std::result::Result<T, TranslateError>;

/// Describes things that can go wrong while translating a single DoH request
#[derive(Debug, Error)]
pub enum TranslateError {
  #[error("Missing, empty or invalid base64url dns query parameter")]
  MalformedEncoding,

  #[error("Unsupported media type")]
  UnsupportedMediaType,

  #[error("Failed to read request body: {0}")]
  BodyReadError(String),

  #[error("Request body exceeds the maximum DNS message size")]
  PayloadTooLarge,

  #[error("Malformed DNS message: {0}")]
  MalformedMessage(String),

  #[error("Method not allowed")]
  MethodNotAllowed,

  #[error("Exchange with the upstream resolver failed: {0}")]
  ExchangeError(#[from] ResolverError),

  #[error("Failed to pack DNS reply: {0}")]
  PackError(String),
}

impl TranslateError {
  /// HTTP status code reported to the client
  pub fn status_code(&self) -> StatusCode {
    match self {
      TranslateError::MalformedEncoding => StatusCode::BAD_REQUEST,
      TranslateError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
      TranslateError::BodyReadError(_) => StatusCode::BAD_REQUEST,
      TranslateError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
      TranslateError::MalformedMessage(_) => StatusCode::BAD_REQUEST,
      TranslateError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
      TranslateError::ExchangeError(ResolverError::Timeout) => StatusCode::GATEWAY_TIMEOUT,
      TranslateError::ExchangeError(_) => StatusCode::BAD_GATEWAY,
      TranslateError::PackError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

/// Failures are reported with the canonical status text only, never with a DNS payload
impl IntoResponse for TranslateError {
  fn into_response(self) -> Response {
    let status = self.status_code();
    let reason = status.canonical_reason().unwrap_or_default();
    (status, [(header::CONTENT_TYPE, TEXT_PLAIN_CONTENT_TYPE)], reason).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_status_codes() {
    assert_eq!(TranslateError::MalformedEncoding.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
      TranslateError::MalformedMessage("x".to_string()).status_code(),
      StatusCode::BAD_REQUEST
    );
    assert_eq!(
      TranslateError::UnsupportedMediaType.status_code(),
      StatusCode::UNSUPPORTED_MEDIA_TYPE
    );
    assert_eq!(TranslateError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
      TranslateError::PackError("x".to_string()).status_code(),
      StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
      TranslateError::from(ResolverError::Timeout).status_code(),
      StatusCode::GATEWAY_TIMEOUT
    );
    assert_eq!(
      TranslateError::from(ResolverError::InvalidResponse("x".to_string())).status_code(),
      StatusCode::BAD_GATEWAY
    );
  }
}
