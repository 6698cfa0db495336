mod constants;
mod controller;
mod dns_message;
mod error;
mod globals;
mod log;
mod resolver;
mod trait_exchange;
mod trait_proxy_service;
mod translator;

use crate::{error::*, globals::Globals, log::*, resolver::SocketExchange, translator::Translator};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub use controller::Controller;
pub use error::DtError;
pub use globals::ProxyConfig;
pub use resolver::{ResolverError, UpstreamProtocol};
pub use trait_exchange::Exchange;
pub use trait_proxy_service::ProxyService;
pub use translator::TranslateError;

/// entrypoint of DoH translator
/// This spawns the query logger and runs the HTTP translator under the controller until `cancel` is cancelled.
/// Failing to bind the listen address is returned as an error.
pub async fn entrypoint(
  proxy_config: &ProxyConfig,
  runtime_handle: &tokio::runtime::Handle,
  cancel: CancellationToken,
) -> Result<()> {
  info!("Start DoH translator");

  // build global
  let (query_log_tx, mut query_logger) = log::QueryLogger::new();
  let globals = Arc::new(Globals {
    proxy_config: proxy_config.clone(),
    runtime_handle: runtime_handle.clone(),
    query_log_tx,
  });

  // spawn query logger service
  globals.runtime_handle.spawn(async move { query_logger.start().await });

  // build translator exchanging queries with the upstream resolver over udp and tcp
  let exchanger = Arc::new(SocketExchange::new(&globals.proxy_config));
  let translator = Arc::new(Translator::new(globals, exchanger)?);

  let controller = Controller::new(runtime_handle.clone(), translator);
  controller.start(cancel).await
}
