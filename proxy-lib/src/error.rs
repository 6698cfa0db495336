pub use anyhow::{anyhow, bail};
use std::net::SocketAddr;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DtError>;

/// Describes things that can go wrong in the translator service
#[derive(Debug, Error)]
pub enum DtError {
  #[error("Failed to bind listen address {0}: {1}")]
  BindError(SocketAddr, std::io::Error),

  #[error("Io Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Invalid header value: {0}")]
  InvalidHeaderValue(#[from] axum::http::header::InvalidHeaderValue),

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("Proxy service error: {0}")]
  ProxyServiceError(String),
}
