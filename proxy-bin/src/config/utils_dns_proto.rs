use crate::constants::DEFAULT_DNS_PORT;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

/// Parse as string in the form of "<ip_addr>:<port>" designating the upstream resolver.
/// ":<port>" can be omitted and then it will be treated as ":53".
/// - <ip_addr>: IPv4 or IPv6 address, where IPv6 address must be enclosed in square brackets like "[::1]"
pub(crate) fn parse_resolver_sockaddr_str<T: AsRef<str>>(val: T) -> anyhow::Result<SocketAddr> {
  let val = val.as_ref().trim();
  anyhow::ensure!(!val.is_empty(), "Empty resolver address specified");

  let socket_addr = if let Some(val_rest) = val.strip_prefix('[') {
    // ipv6
    let (ip_part, port_part) = val_rest
      .split_once(']')
      .ok_or(anyhow::anyhow!("Invalid IPv6 address specified"))?;
    let ip_part = ip_part.parse::<Ipv6Addr>()?;
    let port_part = if port_part.is_empty() {
      DEFAULT_DNS_PORT
    } else {
      let Some(port_part) = port_part.strip_prefix(':') else {
        anyhow::bail!("Invalid port number specified");
      };
      port_part.parse::<u16>()?
    };
    SocketAddr::new(IpAddr::V6(ip_part), port_part)
  } else {
    // ipv4
    let mut split = val.split(':');
    let ip_part = split
      .next()
      .filter(|s| !s.is_empty())
      .ok_or(anyhow::anyhow!("Invalid IPv4 address specified"))?
      .parse::<Ipv4Addr>()?;
    let port_part = match split.next() {
      Some(port_part) => port_part.parse::<u16>()?,
      None => DEFAULT_DNS_PORT,
    };
    anyhow::ensure!(split.next().is_none(), "Invalid resolver address specified");
    SocketAddr::new(IpAddr::V4(ip_part), port_part)
  };

  Ok(socket_addr)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_resolver_sockaddr_str() {
    let socket_addr = parse_resolver_sockaddr_str("[::1]:50053").unwrap();
    assert_eq!(socket_addr, SocketAddr::from((Ipv6Addr::LOCALHOST, 50053)));

    let socket_addr = parse_resolver_sockaddr_str("[::1]").unwrap();
    assert_eq!(socket_addr, SocketAddr::from((Ipv6Addr::LOCALHOST, 53)));

    let socket_addr = parse_resolver_sockaddr_str("8.8.8.8:50053").unwrap();
    assert_eq!(socket_addr, SocketAddr::from(([8, 8, 8, 8], 50053)));

    let socket_addr = parse_resolver_sockaddr_str("75.75.75.75").unwrap();
    assert_eq!(socket_addr, SocketAddr::from(([75, 75, 75, 75], 53)));
  }

  #[test]
  fn test_parse_invalid_resolver_sockaddr_str() {
    assert!(parse_resolver_sockaddr_str("").is_err());
    assert!(parse_resolver_sockaddr_str("resolver.example.com").is_err());
    assert!(parse_resolver_sockaddr_str("8.8.8.8:dns").is_err());
    assert!(parse_resolver_sockaddr_str("8.8.8.8:53:53").is_err());
    assert!(parse_resolver_sockaddr_str("::1").is_err());
    assert!(parse_resolver_sockaddr_str("[::1]53").is_err());
    assert!(parse_resolver_sockaddr_str("[::1").is_err());
  }
}
