// Handle packet buffer of DNS message (encode/decode)
use crate::error::*;
use hickory_proto::{
  op::{Header, Message, MessageType},
  serialize::binary::{BinDecodable, BinEncodable},
};

/// Decode the buffer and check it is a DNS query
pub fn is_query(packet_buf: &[u8]) -> anyhow::Result<Message> {
  let msg = decode(packet_buf)?;
  if msg.message_type() != MessageType::Query {
    bail!("Not a DNS query, id: {}", msg.id());
  }
  Ok(msg)
}

pub fn decode(packet_buf: &[u8]) -> anyhow::Result<Message> {
  Message::from_bytes(packet_buf).map_err(|e| anyhow!("Undecodable packet buffer as DNS message: {}", e))
}

/// Decode a UDP reply. A truncated reply cut in the middle of its records is reduced to its header,
/// which is enough to escalate to TCP.
pub fn decode_udp_reply(packet_buf: &[u8]) -> anyhow::Result<Message> {
  let err = match decode(packet_buf) {
    Ok(msg) => return Ok(msg),
    Err(e) => e,
  };
  let Ok(header) = Header::from_bytes(packet_buf) else {
    return Err(err);
  };
  if !header.truncated() {
    return Err(err);
  }
  let mut msg = Message::new();
  msg.set_header(header);
  Ok(msg)
}

pub fn encode(msg: &Message) -> anyhow::Result<Vec<u8>> {
  msg
    .to_bytes()
    .map_err(|e| anyhow!("Failed to encode DNS message: {}", e))
}

/// Smallest TTL among the answer records, if any
pub fn min_answer_ttl(msg: &Message) -> Option<u32> {
  msg.answers().iter().map(|r| r.ttl()).min()
}
