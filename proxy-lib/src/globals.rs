use crate::{constants::*, log::QueryLoggingBase};
use std::net::SocketAddr;
use tokio::{sync::mpsc, time::Duration};

#[derive(Debug)]
/// Global objects containing shared resources
pub struct Globals {
  /// proxy configuration
  pub proxy_config: ProxyConfig,

  /// tokio runtime handler
  pub runtime_handle: tokio::runtime::Handle,

  /// query logger sender
  pub query_log_tx: mpsc::Sender<QueryLoggingBase>,
}

#[derive(PartialEq, Eq, Debug, Clone)]
/// Translator configuration. Immutable once the service is started.
pub struct ProxyConfig {
  /// upstream resolver receiving the translated queries
  pub resolver: SocketAddr,
  /// address the HTTP listener binds to
  pub listen_address: SocketAddr,
  /// HTTP path serving DoH queries
  pub path: String,
  /// deadline of the upstream exchange, shared by the UDP attempt and the TCP fallback
  pub upstream_timeout: Duration,
  /// UDP receive buffer size
  pub udp_buffer_size: usize,
}

impl Default for ProxyConfig {
  fn default() -> Self {
    Self {
      resolver: RESOLVER_ADDRESS,
      listen_address: LISTEN_ADDRESS,
      path: LISTEN_PATH.to_string(),
      upstream_timeout: Duration::from_secs(UPSTREAM_TIMEOUT_SEC),
      udp_buffer_size: UDP_BUFFER_SIZE,
    }
  }
}

#[cfg(test)]
impl Globals {
  /// Build globals on the current runtime, returning the query log receiver as well
  pub(crate) fn for_test(proxy_config: ProxyConfig) -> (std::sync::Arc<Self>, mpsc::Receiver<QueryLoggingBase>) {
    let (query_log_tx, query_log_rx) = mpsc::channel(QUERY_LOG_CHANNEL_SIZE);
    let globals = Self {
      proxy_config,
      runtime_handle: tokio::runtime::Handle::current(),
      query_log_tx,
    };
    (std::sync::Arc::new(globals), query_log_rx)
  }
}
