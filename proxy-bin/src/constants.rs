/// Configuration file read unless --config is given
pub const DEFAULT_CONFIG_PATH: &str = "/etc/doh-translator/config-doh-translator.toml";

/// Default port of the upstream resolver when omitted
pub const DEFAULT_DNS_PORT: u16 = 53;

/// Default log level when RUST_LOG is not set
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const QUERY_LOG_EVENT_NAME: &str = "query_log";
