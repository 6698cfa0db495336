use super::{ResolverError, ResolverResult, UpstreamProtocol};
use crate::trait_exchange::Exchange;
use async_trait::async_trait;
use hickory_proto::op::Message;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::Duration;

/// Resolver double replying with canned messages and counting calls per transport.
/// A `None` reply makes the exchange fail with a connection refused error.
pub(crate) struct MockExchange {
  udp_reply: Option<Message>,
  tcp_reply: Option<Message>,
  delay: Option<Duration>,
  udp_calls: AtomicUsize,
  tcp_calls: AtomicUsize,
}

impl MockExchange {
  pub(crate) fn new(udp_reply: Option<Message>, tcp_reply: Option<Message>) -> Self {
    Self {
      udp_reply,
      tcp_reply,
      delay: None,
      udp_calls: AtomicUsize::new(0),
      tcp_calls: AtomicUsize::new(0),
    }
  }

  pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
    self.delay = Some(delay);
    self
  }

  pub(crate) fn udp_calls(&self) -> usize {
    self.udp_calls.load(Ordering::SeqCst)
  }

  pub(crate) fn tcp_calls(&self) -> usize {
    self.tcp_calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Exchange for MockExchange {
  async fn exchange(&self, query: &Message, proto: UpstreamProtocol) -> ResolverResult<Message> {
    let (calls, reply) = match proto {
      UpstreamProtocol::Udp => (&self.udp_calls, &self.udp_reply),
      UpstreamProtocol::Tcp => (&self.tcp_calls, &self.tcp_reply),
    };
    calls.fetch_add(1, Ordering::SeqCst);
    if let Some(delay) = self.delay {
      tokio::time::sleep(delay).await;
    }
    match reply {
      Some(reply) => {
        let mut reply = reply.clone();
        reply.set_id(query.id());
        Ok(reply)
      }
      None => Err(ResolverError::Io(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "mock resolver unreachable",
      ))),
    }
  }
}
