use super::{ResolverError, ResolverResult, UpstreamProtocol};
use crate::{globals::Globals, log::*, trait_exchange::Exchange};
use hickory_proto::op::Message;
use std::sync::Arc;
use tokio::time::{timeout_at, Duration, Instant};

/// Upstream reply along with how it was obtained
#[derive(Debug)]
pub struct ResolvedReply {
  /// reply message
  pub message: Message,
  /// transport the reply came through
  pub proto: UpstreamProtocol,
  /// round trip time of the whole exchange, including the fallback
  pub rtt: Duration,
}

/// Client of the upstream resolver, sending queries over UDP first and escalating to TCP once on truncation
pub struct ResolverClient {
  /// transport to the resolver
  exchanger: Arc<dyn Exchange>,
  /// deadline of a whole resolution
  upstream_timeout: Duration,
}

impl ResolverClient {
  pub fn new(globals: &Arc<Globals>, exchanger: Arc<dyn Exchange>) -> Self {
    Self {
      exchanger,
      upstream_timeout: globals.proxy_config.upstream_timeout,
    }
  }

  /// Resolve the query. The udp attempt and the tcp fallback share a single deadline.
  pub async fn resolve(&self, query: &Message) -> ResolverResult<ResolvedReply> {
    let start = Instant::now();
    let deadline = start + self.upstream_timeout;

    let reply = self.exchange_until(query, UpstreamProtocol::Udp, deadline).await?;
    if !reply.truncated() {
      return Ok(ResolvedReply {
        message: reply,
        proto: UpstreamProtocol::Udp,
        rtt: start.elapsed(),
      });
    }

    debug!("Truncated UDP reply for id {}, retrying over TCP", query.id());
    // the tcp reply is used as is, even if truncated again
    let reply = self.exchange_until(query, UpstreamProtocol::Tcp, deadline).await?;
    Ok(ResolvedReply {
      message: reply,
      proto: UpstreamProtocol::Tcp,
      rtt: start.elapsed(),
    })
  }

  async fn exchange_until(&self, query: &Message, proto: UpstreamProtocol, deadline: Instant) -> ResolverResult<Message> {
    timeout_at(deadline, self.exchanger.exchange(query, proto))
      .await
      .map_err(|_| ResolverError::Timeout)?
  }
}
