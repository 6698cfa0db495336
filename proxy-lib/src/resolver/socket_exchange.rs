use super::{ResolverError, ResolverResult, UpstreamProtocol};
use crate::{dns_message, globals::ProxyConfig, log::*, trait_exchange::Exchange};
use async_trait::async_trait;
use hickory_proto::op::Message;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::{
  io::{AsyncReadExt, AsyncWriteExt},
  net::{TcpStream, UdpSocket},
};

/// Exchange with the upstream resolver over plain UDP and TCP sockets
pub struct SocketExchange {
  /// upstream resolver address
  resolver: SocketAddr,
  /// receive buffer size for udp replies
  udp_buffer_size: usize,
}

impl SocketExchange {
  pub fn new(proxy_config: &ProxyConfig) -> Self {
    Self {
      resolver: proxy_config.resolver,
      udp_buffer_size: proxy_config.udp_buffer_size,
    }
  }

  /// Send the query in a single datagram and wait for the reply carrying the same id.
  /// Undecodable datagrams and those with other ids are dropped until the caller's deadline.
  async fn exchange_udp(&self, packet_buf: &[u8], query_id: u16) -> ResolverResult<Message> {
    let bind_addr = if self.resolver.is_ipv4() {
      SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
    } else {
      SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
    };
    let socket = UdpSocket::bind(bind_addr).await?;
    socket.connect(self.resolver).await?;
    socket.send(packet_buf).await?;

    let mut udp_buf = vec![0u8; self.udp_buffer_size];
    loop {
      let len = socket.recv(&mut udp_buf).await?;
      if len >= udp_buf.len() {
        return Err(ResolverError::ResponseTooLarge(len));
      }
      let reply = match dns_message::decode_udp_reply(&udp_buf[..len]) {
        Ok(reply) => reply,
        Err(e) => {
          warn!("Dropped undecodable UDP reply from {}: {e}", self.resolver);
          continue;
        }
      };
      if reply.id() == query_id {
        return Ok(reply);
      }
      warn!(
        "Dropped UDP reply from {} with unexpected id {} (expected {})",
        self.resolver,
        reply.id(),
        query_id
      );
    }
  }

  /// Send the query with a two-byte length prefix and read back a single framed reply
  async fn exchange_tcp(&self, packet_buf: &[u8], query_id: u16) -> ResolverResult<Message> {
    if packet_buf.len() > u16::MAX as usize {
      return Err(ResolverError::InvalidQuery(format!(
        "{} bytes exceed the TCP length prefix",
        packet_buf.len()
      )));
    }
    let mut stream = TcpStream::connect(self.resolver).await?;

    let length_buf = u16::to_be_bytes(packet_buf.len() as u16);
    stream.write_all(&length_buf).await?;
    stream.write_all(packet_buf).await?;
    stream.flush().await?;

    // first 2bytes indicates the length of dns message following from the 3rd byte
    let mut length_buf = [0u8; 2];
    stream.read_exact(&mut length_buf).await?;
    let msg_length = u16::from_be_bytes(length_buf) as usize;
    if msg_length == 0 {
      return Err(ResolverError::InvalidResponse("empty TCP reply".to_string()));
    }
    let mut packet_buf = vec![0u8; msg_length];
    stream.read_exact(&mut packet_buf).await?;

    let reply = dns_message::decode(&packet_buf).map_err(|e| ResolverError::InvalidResponse(e.to_string()))?;
    if reply.id() != query_id {
      return Err(ResolverError::IdMismatch {
        expected: query_id,
        received: reply.id(),
      });
    }
    Ok(reply)
  }
}

#[async_trait]
impl Exchange for SocketExchange {
  async fn exchange(&self, query: &Message, proto: UpstreamProtocol) -> ResolverResult<Message> {
    let packet_buf = dns_message::encode(query).map_err(|e| ResolverError::InvalidQuery(e.to_string()))?;
    debug!("[{proto}] send {} bytes to {}", packet_buf.len(), self.resolver);
    match proto {
      UpstreamProtocol::Udp => self.exchange_udp(&packet_buf, query.id()).await,
      UpstreamProtocol::Tcp => self.exchange_tcp(&packet_buf, query.id()).await,
    }
  }
}
