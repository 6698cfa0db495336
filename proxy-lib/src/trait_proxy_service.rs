use crate::error::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

#[async_trait]
/// Long-running proxy service driven by the controller
pub trait ProxyService: Send + Sync {
  /// Serve until `cancel` is cancelled or `stop` is called. Returns once in-flight requests are drained.
  async fn start(&self, cancel: CancellationToken) -> Result<()>;

  /// Close the listener and let in-flight requests finish
  async fn stop(&self) -> Result<()>;
}
