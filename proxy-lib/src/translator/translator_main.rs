use super::{
  decode::decode_request,
  encode::encode_response,
  error::{TranslateError, TranslateResult},
};
use crate::{
  error::*,
  globals::Globals,
  log::*,
  resolver::ResolverClient,
  trait_exchange::Exchange,
  trait_proxy_service::ProxyService,
};
use async_trait::async_trait;
use axum::{
  extract::{ConnectInfo, Request, State},
  http::HeaderValue,
  response::{IntoResponse, Response},
  routing::any,
  Router,
};
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// DoH to DNS translator serving HTTP requests
#[derive(Clone)]
pub struct Translator {
  globals: Arc<Globals>,
  resolver: Arc<ResolverClient>,
  /// value of the Server header, i.e., the upstream resolver endpoint
  server_header: HeaderValue,
  /// closes the listener when cancelled
  shutdown: CancellationToken,
}

impl Translator {
  /// Create a new translator exchanging queries through `exchanger`
  pub fn new(globals: Arc<Globals>, exchanger: Arc<dyn Exchange>) -> Result<Self> {
    let path = &globals.proxy_config.path;
    if !path.starts_with('/') {
      return Err(DtError::InvalidConfig(format!("path must start with '/': {path}")));
    }
    let server_header = HeaderValue::from_str(&globals.proxy_config.resolver.to_string())?;
    let resolver = Arc::new(ResolverClient::new(&globals, exchanger));
    Ok(Self {
      globals,
      resolver,
      server_header,
      shutdown: CancellationToken::new(),
    })
  }

  /// Router dispatching every method on the configured path to the translation routine
  pub(crate) fn router(&self) -> Router {
    Router::new()
      .route(&self.globals.proxy_config.path, any(serve_dns_query))
      .with_state(self.clone())
  }

  /// Translate a single DoH request into a DNS exchange and back. Always yields a response.
  pub(crate) async fn translate(&self, request: Request) -> Response {
    let start = Instant::now();
    let src_addr = request
      .extensions()
      .get::<ConnectInfo<SocketAddr>>()
      .map(|ConnectInfo(addr)| addr.ip());
    let mut query_log = QueryLoggingBase::new(src_addr, request.method().clone());

    let response = match self.translate_inner(request, &mut query_log).await {
      Ok(res) => res,
      Err(e) => {
        match &e {
          TranslateError::ExchangeError(_) | TranslateError::PackError(_) => error!("{e}"),
          _ => debug!("Rejected DoH request: {e}"),
        }
        e.into_response()
      }
    };

    query_log.finish(response.status(), start.elapsed());
    if let Err(e) = self.globals.query_log_tx.try_send(query_log) {
      debug!("Failed to send query log: {e}");
    }
    response
  }

  async fn translate_inner(&self, request: Request, query_log: &mut QueryLoggingBase) -> TranslateResult<Response> {
    let query_msg = decode_request(request).await?;
    query_log.set_query(&query_msg);
    if let Some(q) = query_msg.query() {
      info!(
        id = query_msg.id(),
        qname = %q.name(),
        qtype = %q.query_type(),
        "DNS request received"
      );
    }

    let resolved = self.resolver.resolve(&query_msg).await?;
    info!(
      rtt_sec = resolved.rtt.as_secs_f64(),
      proto = %resolved.proto,
      "RTT for resolve in seconds"
    );
    query_log.set_reply(&resolved.message, resolved.proto, resolved.rtt);

    encode_response(&resolved.message, &self.server_header)
  }
}

async fn serve_dns_query(State(translator): State<Translator>, request: Request) -> Response {
  translator.translate(request).await
}

#[async_trait]
impl ProxyService for Translator {
  async fn start(&self, cancel: CancellationToken) -> Result<()> {
    let listen_address = self.globals.proxy_config.listen_address;
    let listener = TcpListener::bind(listen_address)
      .await
      .map_err(|e| DtError::BindError(listen_address, e))?;
    info!("Starting DoH translator HTTP server on {}", listener.local_addr()?);
    info!("Resolver in use: {}", self.globals.proxy_config.resolver);

    let shutdown = self.shutdown.clone();
    axum::serve(
      listener,
      self.router().into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
      tokio::select! {
        _ = cancel.cancelled() => {}
        _ = shutdown.cancelled() => {}
      }
      info!("Stop accepting DoH requests, draining in-flight requests");
    })
    .await?;

    info!("DoH translator HTTP server stopped");
    Ok(())
  }

  async fn stop(&self) -> Result<()> {
    self.shutdown.cancel();
    Ok(())
  }
}
