use thiserror::Error;

pub type ResolverResult<T> = std::result::Result<T, ResolverError>;

/// Describes things that can go wrong in the exchange with the upstream resolver
#[derive(Debug, Error)]
pub enum ResolverError {
  #[error("Io error in upstream exchange: {0}")]
  Io(#[from] std::io::Error),

  #[error("Upstream exchange timed out")]
  Timeout,

  #[error("Invalid DNS query: {0}")]
  InvalidQuery(String),

  #[error("Invalid DNS response: {0}")]
  InvalidResponse(String),

  #[error("Response id {received} does not match query id {expected}")]
  IdMismatch { expected: u16, received: u16 },

  #[error("DNS response fills the receive buffer of {0} bytes")]
  ResponseTooLarge(usize),
}
