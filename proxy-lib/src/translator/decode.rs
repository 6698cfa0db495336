use super::error::{TranslateError, TranslateResult};
use crate::{
  constants::{DNS_MESSAGE_CONTENT_TYPE, DNS_QUERY_PARAM, MAX_DNS_MESSAGE_SIZE},
  dns_message,
};
use axum::{
  body::{to_bytes, Body},
  http::{header, Method, Request},
};
use data_encoding::BASE64URL_NOPAD;
use hickory_proto::op::Message;
use http_body_util::LengthLimitError;

/// Extract the DNS query from a DoH request, either from the `dns` parameter of a GET request
/// or from the body of a POST request.
pub(super) async fn decode_request(request: Request<Body>) -> TranslateResult<Message> {
  let packet_buf = match *request.method() {
    Method::GET => decode_get_query(request.uri().query())?,
    Method::POST => read_post_body(request).await?,
    _ => return Err(TranslateError::MethodNotAllowed),
  };

  dns_message::is_query(&packet_buf).map_err(|e| TranslateError::MalformedMessage(e.to_string()))
}

/// Decode the base64url (no padding) `dns` query parameter
fn decode_get_query(query: Option<&str>) -> TranslateResult<Vec<u8>> {
  let Some(dns_param) = query.and_then(|q| {
    url::form_urlencoded::parse(q.as_bytes())
      .find(|(k, _)| k == DNS_QUERY_PARAM)
      .map(|(_, v)| v)
  }) else {
    return Err(TranslateError::MalformedEncoding);
  };

  let packet_buf = BASE64URL_NOPAD
    .decode(dns_param.as_bytes())
    .map_err(|_| TranslateError::MalformedEncoding)?;
  if packet_buf.is_empty() {
    return Err(TranslateError::MalformedEncoding);
  }
  Ok(packet_buf)
}

/// Read the raw message from a POST body of type application/dns-message
async fn read_post_body(request: Request<Body>) -> TranslateResult<Vec<u8>> {
  let content_type = request.headers().get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok());
  if content_type != Some(DNS_MESSAGE_CONTENT_TYPE) {
    return Err(TranslateError::UnsupportedMediaType);
  }

  let declared_length = request
    .headers()
    .get(header::CONTENT_LENGTH)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.parse::<usize>().ok());
  if declared_length.is_some_and(|len| len > MAX_DNS_MESSAGE_SIZE) {
    return Err(TranslateError::PayloadTooLarge);
  }

  // bodies without a declared length are cut at the limit while reading
  let body = to_bytes(request.into_body(), MAX_DNS_MESSAGE_SIZE).await.map_err(|e| {
    if std::error::Error::source(&e).is_some_and(|source| source.is::<LengthLimitError>()) {
      TranslateError::PayloadTooLarge
    } else {
      TranslateError::BodyReadError(e.to_string())
    }
  })?;
  Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dns_message::test_util::*;

  fn get_request(uri: &str) -> Request<Body> {
    Request::builder().method(Method::GET).uri(uri).body(Body::empty()).unwrap()
  }

  fn post_request(content_type: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri("/");
    if let Some(ct) = content_type {
      builder = builder.header(header::CONTENT_TYPE, ct);
    }
    builder.body(Body::from(body)).unwrap()
  }

  #[tokio::test]
  async fn test_get_query_reconstructs_message() {
    for (fqdn, id) in [("www.example.com.", 0u16), ("a.b.c.example.org.", 0xbeef), ("localhost.", 1)] {
      let query = build_query_a(fqdn, id);
      let encoded = BASE64URL_NOPAD.encode(&dns_message::encode(&query).unwrap());
      let decoded = decode_request(get_request(&format!("/?dns={encoded}"))).await.unwrap();
      assert_eq!(decoded.id(), id);
      assert_eq!(decoded.queries(), query.queries());
    }
  }

  #[tokio::test]
  async fn test_get_query_with_other_parameters() {
    let query = build_query_a("www.example.com.", 3);
    let encoded = BASE64URL_NOPAD.encode(&dns_message::encode(&query).unwrap());
    let decoded = decode_request(get_request(&format!("/?ct=application/dns-message&dns={encoded}")))
      .await
      .unwrap();
    assert_eq!(decoded.queries(), query.queries());
  }

  #[tokio::test]
  async fn test_get_query_malformed_encoding() {
    for uri in ["/", "/?dns=", "/?other=AAAA", "/?dns=!!!!", "/?dns=AAABIAABAAAAAAAAA3d3dwdleGFtcGxlA2NvbQAAAQAB=="] {
      let res = decode_request(get_request(uri)).await;
      assert!(matches!(res, Err(TranslateError::MalformedEncoding)), "{uri}");
    }
  }

  #[tokio::test]
  async fn test_get_query_malformed_message() {
    // valid base64url, but not a DNS message
    let res = decode_request(get_request("/?dns=AAEC")).await;
    assert!(matches!(res, Err(TranslateError::MalformedMessage(_))));
  }

  #[tokio::test]
  async fn test_post_body() {
    let query = build_query_a("www.example.com.", 0x1111);
    let body = dns_message::encode(&query).unwrap();
    let decoded = decode_request(post_request(Some(DNS_MESSAGE_CONTENT_TYPE), body))
      .await
      .unwrap();
    assert_eq!(decoded.id(), 0x1111);
    assert_eq!(decoded.queries(), query.queries());
  }

  #[tokio::test]
  async fn test_post_wrong_content_type() {
    let query = build_query_a("www.example.com.", 1);
    let body = dns_message::encode(&query).unwrap();
    for ct in [None, Some("application/octet-stream"), Some("text/plain")] {
      let res = decode_request(post_request(ct, body.clone())).await;
      assert!(matches!(res, Err(TranslateError::UnsupportedMediaType)));
    }
  }

  #[tokio::test]
  async fn test_post_garbage_body() {
    let res = decode_request(post_request(Some(DNS_MESSAGE_CONTENT_TYPE), vec![0xff; 5])).await;
    assert!(matches!(res, Err(TranslateError::MalformedMessage(_))));
    let res = decode_request(post_request(Some(DNS_MESSAGE_CONTENT_TYPE), vec![])).await;
    assert!(matches!(res, Err(TranslateError::MalformedMessage(_))));
  }

  #[tokio::test]
  async fn test_post_oversized_body() {
    let request = Request::builder()
      .method(Method::POST)
      .uri("/")
      .header(header::CONTENT_TYPE, DNS_MESSAGE_CONTENT_TYPE)
      .header(header::CONTENT_LENGTH, (MAX_DNS_MESSAGE_SIZE + 1).to_string())
      .body(Body::from(vec![0u8; MAX_DNS_MESSAGE_SIZE + 1]))
      .unwrap();
    assert!(matches!(decode_request(request).await, Err(TranslateError::PayloadTooLarge)));
  }

  #[tokio::test]
  async fn test_post_oversized_body_without_content_length() {
    let request = post_request(Some(DNS_MESSAGE_CONTENT_TYPE), vec![0u8; MAX_DNS_MESSAGE_SIZE + 1]);
    assert!(request.headers().get(header::CONTENT_LENGTH).is_none());
    assert!(matches!(decode_request(request).await, Err(TranslateError::PayloadTooLarge)));
  }

  #[tokio::test]
  async fn test_post_body_at_limit_is_read() {
    // a body of exactly the limit is read and then rejected as a DNS message only
    let request = post_request(Some(DNS_MESSAGE_CONTENT_TYPE), vec![0xffu8; MAX_DNS_MESSAGE_SIZE]);
    assert!(matches!(decode_request(request).await, Err(TranslateError::MalformedMessage(_))));
  }

  #[tokio::test]
  async fn test_other_methods() {
    for method in [Method::PUT, Method::DELETE, Method::PATCH, Method::HEAD] {
      let request = Request::builder().method(method).uri("/").body(Body::empty()).unwrap();
      assert!(matches!(decode_request(request).await, Err(TranslateError::MethodNotAllowed)));
    }
  }
}
