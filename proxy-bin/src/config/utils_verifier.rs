// functions to verify the startup arguments as correct
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Parse the listen address. ":<port>" binds all IPv4 interfaces.
pub(crate) fn parse_listen_addr(arg_val: &str) -> Result<SocketAddr, String> {
  let arg_val = arg_val.trim();
  if let Some(port) = arg_val.strip_prefix(':') {
    return match port.parse::<u16>() {
      Ok(port) => Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)),
      Err(_) => Err(format!("Could not parse \"{}\" as a valid port number.", port)),
    };
  }
  match arg_val.parse::<SocketAddr>() {
    Ok(addr) => Ok(addr),
    Err(_) => Err(format!(
      "Could not parse \"{}\" as a valid socket address (with port).",
      arg_val
    )),
  }
}

/// HTTP path must be absolute
pub(crate) fn verify_path(arg_val: &str) -> Result<(), String> {
  if !arg_val.starts_with('/') {
    return Err(format!("Path \"{}\" must start with '/'.", arg_val));
  }
  if arg_val.contains(['?', '#']) {
    return Err(format!("Path \"{}\" must not contain query or fragment.", arg_val));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_listen_addr() {
    assert_eq!(parse_listen_addr(":80").unwrap(), SocketAddr::from(([0, 0, 0, 0], 80)));
    assert_eq!(
      parse_listen_addr("127.0.0.1:8053").unwrap(),
      SocketAddr::from(([127, 0, 0, 1], 8053))
    );
    assert_eq!(
      parse_listen_addr("[::1]:443").unwrap(),
      SocketAddr::from((std::net::Ipv6Addr::LOCALHOST, 443))
    );
    assert!(parse_listen_addr(":http").is_err());
    assert!(parse_listen_addr("127.0.0.1").is_err());
    assert!(parse_listen_addr("").is_err());
  }

  #[test]
  fn test_verify_path() {
    assert!(verify_path("/").is_ok());
    assert!(verify_path("/dns-query").is_ok());
    assert!(verify_path("dns-query").is_err());
    assert!(verify_path("/dns-query?dns=").is_err());
  }
}
