use crate::{error::*, log::*, trait_proxy_service::ProxyService};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Supervisor running the proxy service until cancellation
pub struct Controller {
  runtime_handle: tokio::runtime::Handle,
  proxy: Arc<dyn ProxyService>,
}

impl Controller {
  pub fn new(runtime_handle: tokio::runtime::Handle, proxy: Arc<dyn ProxyService>) -> Self {
    Self { runtime_handle, proxy }
  }

  /// Run the proxy until `cancel` is cancelled, then stop it and wait for the drain.
  /// A proxy failing on its own, e.g., failing to bind, is returned as an error.
  pub async fn start(&self, cancel: CancellationToken) -> Result<()> {
    let proxy = self.proxy.clone();
    let proxy_cancel = cancel.child_token();
    let mut proxy_service = self.runtime_handle.spawn(async move { proxy.start(proxy_cancel).await });

    tokio::select! {
      res = &mut proxy_service => {
        let res = res.map_err(|e| DtError::ProxyServiceError(e.to_string()))?;
        if let Err(e) = &res {
          error!("Proxy execution error: {e}");
        } else {
          warn!("Proxy service exited without cancellation");
        }
        res
      }
      _ = cancel.cancelled() => {
        info!("Controller start - context cancelled, stopping proxy");
        self.proxy.stop().await?;
        proxy_service
          .await
          .map_err(|e| DtError::ProxyServiceError(e.to_string()))?
      }
    }
  }
}
