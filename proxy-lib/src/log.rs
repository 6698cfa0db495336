pub use tracing::{debug, error, info, warn};

use crate::{
  constants::{QUERY_LOG_CHANNEL_SIZE, QUERY_LOG_EVENT_NAME},
  resolver::UpstreamProtocol,
};
use axum::http::{Method, StatusCode};
use hickory_proto::op::{Message, ResponseCode};
use std::{net::IpAddr, time::Duration};
use tokio::sync::mpsc;

#[derive(Debug)]
/// Logging base for a translated DoH request
pub struct QueryLoggingBase {
  /// Source address of the HTTP client, if known
  src_addr: Option<IpAddr>,
  /// HTTP method of the request
  method: Method,
  /// Decoded DNS query
  query: Option<Message>,
  /// Response code of the upstream reply
  rcode: Option<ResponseCode>,
  /// Transport the final upstream reply came through
  proto: Option<UpstreamProtocol>,
  /// Round trip time of the upstream exchange
  rtt: Option<Duration>,
  /// HTTP status returned to the client
  status: StatusCode,
  /// Total handling time
  elapsed: Duration,
}

impl QueryLoggingBase {
  pub(crate) fn new(src_addr: Option<IpAddr>, method: Method) -> Self {
    Self {
      src_addr,
      method,
      query: None,
      rcode: None,
      proto: None,
      rtt: None,
      status: StatusCode::OK,
      elapsed: Duration::ZERO,
    }
  }

  pub(crate) fn set_query(&mut self, query: &Message) {
    self.query = Some(query.clone());
  }

  pub(crate) fn set_reply(&mut self, reply: &Message, proto: UpstreamProtocol, rtt: Duration) {
    self.rcode = Some(reply.response_code());
    self.proto = Some(proto);
    self.rtt = Some(rtt);
  }

  pub(crate) fn finish(&mut self, status: StatusCode, elapsed: Duration) {
    self.status = status;
    self.elapsed = elapsed;
  }

  #[cfg(test)]
  pub fn proto(&self) -> Option<UpstreamProtocol> {
    self.proto
  }

  #[cfg(test)]
  pub fn status(&self) -> StatusCode {
    self.status
  }

  /// Log the request-response through tracing
  pub fn log(&self) {
    let span = tracing::info_span!(QUERY_LOG_EVENT_NAME);
    let _guard = span.enter();

    let src = self
      .src_addr
      .map(|v| v.to_string())
      .unwrap_or_else(|| "unknown".to_string());
    let method = self.method.to_string();
    let (id, qname, qtype, qclass) = self
      .query
      .as_ref()
      .and_then(|m| {
        m.query()
          .map(|q| (m.id(), q.name().to_string(), q.query_type().to_string(), q.query_class().to_string()))
      })
      .unwrap_or_default();
    let rcode = self.rcode.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
    let proto = self.proto.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());
    let status = self.status.as_u16();
    let rtt_sec = self.rtt.map(|v| v.as_secs_f64()).unwrap_or_default();
    let elapsed_micros = self.elapsed.as_micros();

    tracing::event!(
      name: QUERY_LOG_EVENT_NAME,
      tracing::Level::INFO,
      src,
      method,
      id,
      qname,
      qtype,
      qclass,
      rcode,
      proto,
      status,
      rtt_sec,
      elapsed_micros
    );
  }
}

/// Logger for translated requests
pub(crate) struct QueryLogger {
  /// Receiver for log entries
  query_log_rx: mpsc::Receiver<QueryLoggingBase>,
}

impl QueryLogger {
  /// Create a new instance of QueryLogger
  pub(crate) fn new() -> (mpsc::Sender<QueryLoggingBase>, Self) {
    let (query_log_tx, query_log_rx) = mpsc::channel(QUERY_LOG_CHANNEL_SIZE);
    (query_log_tx, Self { query_log_rx })
  }

  /// Start the logger service. Returns when every sender is dropped.
  pub(crate) async fn start(&mut self) {
    while let Some(qr_log) = self.query_log_rx.recv().await {
      qr_log.log();
    }
    debug!("Query logger finished");
  }
}
