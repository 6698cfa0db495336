use super::{toml::ConfigToml, utils_dns_proto::parse_resolver_sockaddr_str, utils_verifier::*};
use crate::{error::*, log::*};
use doh_translator_lib::ProxyConfig;
use tokio::time::Duration;

impl TryInto<ProxyConfig> for &ConfigToml {
  type Error = anyhow::Error;

  fn try_into(self) -> std::result::Result<ProxyConfig, Self::Error> {
    let mut proxy_config = ProxyConfig::default();

    /////////////////////////////
    // resolver
    if let Some(val) = &self.resolver {
      proxy_config.resolver =
        parse_resolver_sockaddr_str(val).with_context(|| format!("Invalid resolver address: {val}"))?;
    }

    /////////////////////////////
    // listen address
    if let Some(val) = &self.listen {
      proxy_config.listen_address = parse_listen_addr(val).map_err(|e| anyhow!(e))?;
    }
    info!("Listen address: {}", proxy_config.listen_address);

    /////////////////////////////
    // path
    if let Some(val) = &self.path {
      verify_path(val).map_err(|e| anyhow!(e))?;
      proxy_config.path = val.to_owned();
    }
    info!("Serving DoH queries on path: {}", proxy_config.path);

    /////////////////////////////
    // upstream timeout
    if let Some(val) = self.upstream_timeout {
      ensure!(val > 0, "upstream_timeout must be positive");
      proxy_config.upstream_timeout = Duration::from_secs(val);
    }
    info!("Upstream timeout: {} sec", proxy_config.upstream_timeout.as_secs());

    Ok(proxy_config)
  }
}
