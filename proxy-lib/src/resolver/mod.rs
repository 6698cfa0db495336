mod error;
#[cfg(test)]
pub(crate) mod mock;
mod resolver_main;
mod socket_exchange;

pub use error::{ResolverError, ResolverResult};
pub use resolver_main::ResolverClient;
pub use socket_exchange::SocketExchange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Transport used towards the upstream resolver
pub enum UpstreamProtocol {
  /// Udp, the default transport
  Udp,
  /// Tcp, used when the udp reply is truncated
  Tcp,
}

impl std::fmt::Display for UpstreamProtocol {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      UpstreamProtocol::Udp => write!(f, "UDP"),
      UpstreamProtocol::Tcp => write!(f, "TCP"),
    }
  }
}
