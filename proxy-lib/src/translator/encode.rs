use super::error::{TranslateError, TranslateResult};
use crate::{constants::DNS_MESSAGE_CONTENT_TYPE, dns_message};
use axum::{
  body::Body,
  http::{header, HeaderValue, StatusCode},
  response::Response,
};
use hickory_proto::op::Message;

/// Build the 200 response carrying the packed upstream reply.
/// `server` is echoed in the Server header; Cache-Control follows the smallest answer TTL (RFC 8484 5.1).
pub(super) fn encode_response(reply: &Message, server: &HeaderValue) -> TranslateResult<Response> {
  let packet_buf = dns_message::encode(reply).map_err(|e| TranslateError::PackError(e.to_string()))?;

  let mut response = Response::new(Body::from(packet_buf));
  *response.status_mut() = StatusCode::OK;
  let headers = response.headers_mut();
  headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(DNS_MESSAGE_CONTENT_TYPE));
  headers.insert(header::SERVER, server.clone());
  if let Some(ttl) = dns_message::min_answer_ttl(reply) {
    if let Ok(v) = HeaderValue::from_str(&format!("max-age={ttl}")) {
      headers.insert(header::CACHE_CONTROL, v);
    }
  }
  Ok(response)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dns_message::test_util::*;
  use http_body_util::BodyExt;
  use std::net::Ipv4Addr;

  #[tokio::test]
  async fn test_encode_response() {
    let query = build_query_a("www.example.com.", 0);
    let reply = build_response_a(&query, Ipv4Addr::new(93, 184, 216, 34), 3600);
    let server = HeaderValue::from_static("75.75.75.75:53");

    let response = encode_response(&reply, &server).unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], DNS_MESSAGE_CONTENT_TYPE);
    assert_eq!(response.headers()[header::SERVER], "75.75.75.75:53");
    assert_eq!(response.headers()[header::CACHE_CONTROL], "max-age=3600");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.to_vec(), dns_message::encode(&reply).unwrap());
  }

  #[tokio::test]
  async fn test_encode_response_without_answers() {
    let query = build_query_a("nx.example.com.", 5);
    let reply = build_truncated_response(&query);
    let server = HeaderValue::from_static("[::1]:53");

    let response = encode_response(&reply, &server).unwrap();
    assert!(response.headers().get(header::CACHE_CONTROL).is_none());
    assert_eq!(response.headers()[header::SERVER], "[::1]:53");
  }
}
