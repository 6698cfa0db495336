use std::net::{IpAddr, Ipv4Addr, SocketAddr};

////////////////////////////////
// Constant Values for Config //
////////////////////////////////
// Cannot override by config.toml

/// UDP receive buffer size for upstream replies
pub const UDP_BUFFER_SIZE: usize = 65535;
/// Largest DNS message accepted in a POST body (RFC 1035 upper bound over TCP)
pub const MAX_DNS_MESSAGE_SIZE: usize = 65535;
/// Capacity of the channel feeding the query logger
pub const QUERY_LOG_CHANNEL_SIZE: usize = 1024;
/// Event name of query log entries, used by the subscriber to route them
pub const QUERY_LOG_EVENT_NAME: &str = "query_log";

////////////////////////////////
// Default Values for Config  //
////////////////////////////////
// Can override by specifying values in config.toml

/// Default upstream resolver
pub const RESOLVER_ADDRESS: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(75, 75, 75, 75)), 53);
/// Default listen address
pub const LISTEN_ADDRESS: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 80);
/// Default HTTP path serving DoH queries
pub const LISTEN_PATH: &str = "/";
/// Deadline for the whole upstream exchange of a request (UDP and TCP fallback)
pub const UPSTREAM_TIMEOUT_SEC: u64 = 5;

///////////////////////////////
// Constant Values for DoH   //
///////////////////////////////

/// Media type of DNS wire-format messages (RFC 8484)
pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";
/// Query parameter carrying the base64url-encoded message in GET requests
pub const DNS_QUERY_PARAM: &str = "dns";
/// Content type of plain-text error bodies
pub const TEXT_PLAIN_CONTENT_TYPE: &str = "text/plain; charset=utf-8";
