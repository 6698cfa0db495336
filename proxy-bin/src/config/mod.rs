mod parse;
mod proxy_config;
mod toml;
mod utils_dns_proto;
mod utils_verifier;

pub use {
  self::toml::{ConfigToml, LoggerToml},
  parse::{parse_opts, Opts},
};
