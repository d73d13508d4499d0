//! Field-level comparison of a parsed reply against the request that
//! elicited it (SPEC_FULL.md S4.3). Never touches the raw bytes the reply
//! was parsed from, only the per-field flags on [`IcmpReplyView`].

use crate::packet::EchoRequest;
use crate::reply::IcmpReplyView;

/// Annotates `reply`'s validity flags in place against `request`, returning
/// the overall `is_valid` conjunction.
pub fn validate_reply(reply: &mut IcmpReplyView, request: &EchoRequest) -> bool {
    reply.sequence_valid = reply.sequence == request.sequence;
    reply.identifier_valid = reply.identifier == request.identifier;
    reply.payload_valid = reply.echoed_payload == request.payload;
    reply.type_valid = reply.icmp_type == 0;
    reply.code_valid = reply.icmp_code == 0;

    reply.is_valid = reply.sequence_valid
        && reply.identifier_valid
        && reply.payload_valid
        && reply.type_valid
        && reply.code_valid;
    reply.is_valid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_reply_is_valid() {
        let request = EchoRequest::build_at(1, 2, 3.0);
        let mut reply = IcmpReplyView {
            ip_ttl: 64,
            icmp_type: 0,
            icmp_code: 0,
            header_checksum: 0,
            identifier: request.identifier,
            sequence: request.sequence,
            echoed_timestamp: request.timestamp,
            echoed_payload: request.payload.to_string(),
            identifier_valid: false,
            sequence_valid: false,
            payload_valid: false,
            type_valid: false,
            code_valid: false,
            header_checksum_valid: false,
            is_valid: false,
        };

        assert!(validate_reply(&mut reply, &request));
        assert!(reply.identifier_valid);
        assert!(reply.sequence_valid);
        assert!(reply.payload_valid);
        assert!(reply.type_valid);
        assert!(reply.code_valid);
        assert!(!reply.header_checksum_valid);
    }

    #[test]
    fn flipping_one_field_clears_only_that_flag() {
        let request = EchoRequest::build_at(1, 2, 3.0);
        let base = IcmpReplyView {
            ip_ttl: 64,
            icmp_type: 0,
            icmp_code: 0,
            header_checksum: 0,
            identifier: request.identifier,
            sequence: request.sequence,
            echoed_timestamp: request.timestamp,
            echoed_payload: request.payload.to_string(),
            identifier_valid: false,
            sequence_valid: false,
            payload_valid: false,
            type_valid: false,
            code_valid: false,
            header_checksum_valid: false,
            is_valid: false,
        };

        let mut wrong_seq = base.clone();
        wrong_seq.sequence = request.sequence.wrapping_add(1);
        assert!(!validate_reply(&mut wrong_seq, &request));
        assert!(!wrong_seq.sequence_valid);
        assert!(wrong_seq.identifier_valid);
        assert!(wrong_seq.payload_valid);

        let mut wrong_type = base;
        wrong_type.icmp_type = 8;
        assert!(!validate_reply(&mut wrong_type, &request));
        assert!(!wrong_type.type_valid);
        assert!(wrong_type.sequence_valid);
    }
}
