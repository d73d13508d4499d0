//! Read-only projection over an OS-delivered ICMP reply datagram, per
//! SPEC_FULL.md S3 ("Icmp Reply View"). Offsets are fixed, assuming a
//! 20-byte IPv4 header with no options, exactly as the reference source
//! does.

use crate::error::{Error, Result};

pub const IP_HEADER_SIZE: usize = 20;
const TYPE_OFFSET: usize = IP_HEADER_SIZE;
const CODE_OFFSET: usize = IP_HEADER_SIZE + 1;
const CHECKSUM_OFFSET: usize = IP_HEADER_SIZE + 2;
const IDENTIFIER_OFFSET: usize = IP_HEADER_SIZE + 4;
const SEQUENCE_OFFSET: usize = IP_HEADER_SIZE + 6;
const TIMESTAMP_OFFSET: usize = IP_HEADER_SIZE + 8;
const PAYLOAD_OFFSET: usize = IP_HEADER_SIZE + 16;
const IP_TTL_OFFSET: usize = 8;

/// Parsed view of an inbound ICMP message, plus the per-field validity flags
/// a [`crate::validate::ReplyValidator`] annotates after comparison against
/// the original request.
#[derive(Debug, Clone)]
pub struct IcmpReplyView {
    pub ip_ttl: u8,
    pub icmp_type: u8,
    pub icmp_code: u8,
    pub header_checksum: u16,
    pub identifier: u16,
    pub sequence: u16,
    pub echoed_timestamp: f64,
    pub echoed_payload: String,

    pub identifier_valid: bool,
    pub sequence_valid: bool,
    pub payload_valid: bool,
    pub type_valid: bool,
    pub code_valid: bool,
    /// Never computed by this crate's validator, matching the reference
    /// source (see SPEC_FULL.md S9, "Open question (resolved)").
    pub header_checksum_valid: bool,
    pub is_valid: bool,
}

impl IcmpReplyView {
    /// Parses `raw`, the full buffer handed back by the OS (IP header +
    /// ICMP message). Validity flags all start `false` until a
    /// [`crate::validate::ReplyValidator`] runs.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        if raw.len() < PAYLOAD_OFFSET {
            return Err(Error::InvalidReply("buffer shorter than ICMP header"));
        }

        let icmp_type = raw[TYPE_OFFSET];
        let icmp_code = raw[CODE_OFFSET];
        let header_checksum = u16::from_be_bytes([raw[CHECKSUM_OFFSET], raw[CHECKSUM_OFFSET + 1]]);
        let identifier = u16::from_be_bytes([raw[IDENTIFIER_OFFSET], raw[IDENTIFIER_OFFSET + 1]]);
        let sequence = u16::from_be_bytes([raw[SEQUENCE_OFFSET], raw[SEQUENCE_OFFSET + 1]]);
        let echoed_timestamp = f64::from_le_bytes(
            raw[TIMESTAMP_OFFSET..TIMESTAMP_OFFSET + 8]
                .try_into()
                .expect("slice is exactly 8 bytes"),
        );
        let echoed_payload = String::from_utf8_lossy(&raw[PAYLOAD_OFFSET..]).into_owned();
        let ip_ttl = raw[IP_TTL_OFFSET];

        Ok(IcmpReplyView {
            ip_ttl,
            icmp_type,
            icmp_code,
            header_checksum,
            identifier,
            sequence,
            echoed_timestamp,
            echoed_payload,
            identifier_valid: false,
            sequence_valid: false,
            payload_valid: false,
            type_valid: false,
            code_valid: false,
            header_checksum_valid: false,
            is_valid: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::EchoRequest;

    fn synthetic_reply(req: &EchoRequest) -> Vec<u8> {
        let mut buf = vec![0u8; IP_HEADER_SIZE];
        buf[IP_TTL_OFFSET] = 50;
        buf.push(0); // type = echo reply
        buf.push(0); // code
        buf.extend_from_slice(&[0, 0]); // header checksum, never verified
        buf.extend_from_slice(&req.identifier.to_be_bytes());
        buf.extend_from_slice(&req.sequence.to_be_bytes());
        buf.extend_from_slice(&req.timestamp.to_le_bytes());
        buf.extend_from_slice(req.payload.as_bytes());
        buf
    }

    #[test]
    fn parses_fields_at_fixed_offsets() {
        let req = EchoRequest::build_at(0x1234, 1, 5.0);
        let raw = synthetic_reply(&req);

        let view = IcmpReplyView::parse(&raw).unwrap();
        assert_eq!(view.icmp_type, 0);
        assert_eq!(view.icmp_code, 0);
        assert_eq!(view.identifier, 0x1234);
        assert_eq!(view.sequence, 1);
        assert_eq!(view.echoed_timestamp, 5.0);
        assert_eq!(view.echoed_payload, req.payload);
        assert_eq!(view.ip_ttl, 50);
        assert!(!view.is_valid);
    }

    #[test]
    fn rejects_truncated_buffer() {
        assert!(IcmpReplyView::parse(&[0u8; 10]).is_err());
    }
}
