use crate::resolver::{ResolverResult, UpstreamProtocol};
use async_trait::async_trait;
use hickory_proto::op::Message;

#[async_trait]
/// Single query/reply exchange with the upstream resolver over the given transport.
/// Deadlines are enforced by the caller.
pub trait Exchange: Send + Sync {
  async fn exchange(&self, query: &Message, proto: UpstreamProtocol) -> ResolverResult<Message>;
}
