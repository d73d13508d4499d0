//! Drives one echo request to completion: build the datagram, hand it to a
//! [`Transport`], wait out the deadline, classify whatever comes back.
//! Grounded on the reference source's `sendEchoRequest` (SPEC_FULL.md S4.2).

use std::net::{IpAddr, SocketAddr};
use std::time::Instant;

use crate::codes::describe;
use crate::config::ProbeConfig;
use crate::packet::EchoRequest;
use crate::reply::IcmpReplyView;
use crate::transport::{Transport, TransportFactory};
use crate::validate::validate_reply;

const RECV_BUFFER_SIZE: usize = 1024;
const ICMP_TYPE_OFFSET: usize = 20;
const ICMP_CODE_OFFSET: usize = 21;

/// One probe's outcome. `NoResult` covers every contained failure: timeout,
/// garbled reply, or an OS error that isn't network-unreachable.
#[derive(Debug)]
pub enum ProbeResult {
    EchoReply { rtt_ms: f64, reply: IcmpReplyView },
    Hop {
        addr: IpAddr,
        rtt_ms: f64,
        icmp_type: u8,
        icmp_code: u8,
        description: String,
    },
    NoResult,
}

impl ProbeResult {
    pub fn rtt_ms(&self) -> Option<f64> {
        match self {
            ProbeResult::EchoReply { rtt_ms, .. } => Some(*rtt_ms),
            ProbeResult::Hop { rtt_ms, .. } => Some(*rtt_ms),
            ProbeResult::NoResult => None,
        }
    }

    pub fn is_echo_reply(&self) -> bool {
        matches!(self, ProbeResult::EchoReply { .. })
    }
}

pub struct RawSocketProbe<F: TransportFactory> {
    factory: F,
    config: ProbeConfig,
}

impl<F: TransportFactory> RawSocketProbe<F> {
    pub fn new(factory: F, config: ProbeConfig) -> Self {
        RawSocketProbe { factory, config }
    }

    pub fn default_ttl(&self) -> u32 {
        self.config.ttl
    }

    /// Sends one echo request with IP TTL `ttl`, letting callers (e.g. a
    /// traceroute session) vary it per hop instead of being pinned to
    /// `config.ttl`.
    pub fn send_echo_request(&self, request: &EchoRequest, dest: IpAddr, ttl: u32) -> ProbeResult {
        let mut transport = match self.factory.open() {
            Ok(t) => t,
            Err(e) => return self.classify_os_error(&e, dest, ttl),
        };

        if transport.set_ttl(ttl).is_err() {
            // TTL is best-effort cosmetic state; a failure here doesn't
            // invalidate the probe itself.
        }
        let _ = transport.set_read_timeout(Some(self.config.timeout));

        let buf = request.encode();
        let dest_addr = SocketAddr::new(dest, 0);
        let send_time = Instant::now();

        if let Err(e) = transport.send_to(&buf, dest_addr) {
            return self.classify_os_error(&e, dest, ttl);
        }

        let mut recv_buf = [0u8; RECV_BUFFER_SIZE];
        match transport.recv(&mut recv_buf) {
            Ok(n) => {
                let elapsed = send_time.elapsed();
                if elapsed >= self.config.timeout {
                    // Readiness came back, but the residual budget is
                    // already spent (mirrors the source's post-select
                    // `timeLeft <= 0` check).
                    self.report_timeout();
                    return ProbeResult::NoResult;
                }
                let rtt_ms = elapsed.as_secs_f64() * 1000.0;
                self.dispatch(&recv_buf[..n], rtt_ms, request, dest, ttl)
            }
            Err(e) if is_timeout(&e) => {
                self.report_timeout();
                ProbeResult::NoResult
            }
            Err(e) => self.classify_os_error(&e, dest, ttl),
        }
    }

    fn dispatch(
        &self,
        raw: &[u8],
        rtt_ms: f64,
        request: &EchoRequest,
        dest: IpAddr,
        ttl: u32,
    ) -> ProbeResult {
        if raw.len() <= ICMP_CODE_OFFSET {
            self.report_unknown(0, rtt_ms, dest, ttl);
            return ProbeResult::NoResult;
        }
        let icmp_type = raw[ICMP_TYPE_OFFSET];
        let icmp_code = raw[ICMP_CODE_OFFSET];

        match icmp_type {
            0 => match IcmpReplyView::parse(raw) {
                Ok(mut view) => {
                    validate_reply(&mut view, request);
                    self.report_echo_reply(&view, rtt_ms, dest);
                    ProbeResult::EchoReply { rtt_ms, reply: view }
                }
                Err(_) => {
                    self.report_unknown(icmp_type, rtt_ms, dest, ttl);
                    ProbeResult::NoResult
                }
            },
            11 | 3 => {
                let description = describe(icmp_type, icmp_code);
                self.report_hop(icmp_type, icmp_code, &description, rtt_ms, dest, ttl);
                ProbeResult::Hop {
                    addr: dest,
                    rtt_ms,
                    icmp_type,
                    icmp_code,
                    description,
                }
            }
            other => {
                self.report_unknown(other, rtt_ms, dest, ttl);
                ProbeResult::NoResult
            }
        }
    }

    fn classify_os_error(&self, error: &std::io::Error, dest: IpAddr, ttl: u32) -> ProbeResult {
        if is_network_unreachable(error) {
            if self.config.verbose {
                println!(
                    "  TTL={ttl}    RTT=0 ms    Type=3    Code=0    Network Unreachable    (OS Error: {error})"
                );
            }
            return ProbeResult::Hop {
                addr: dest,
                rtt_ms: 0.0,
                icmp_type: 3,
                icmp_code: 0,
                description: "Network Unreachable (OS Level)".to_string(),
            };
        }
        if self.config.verbose {
            println!("  TTL={ttl}    Network Error: {error}");
        }
        ProbeResult::NoResult
    }

    fn report_timeout(&self) {
        println!("  *        *        *        *        *    Request timed out.");
    }

    fn report_echo_reply(&self, reply: &IcmpReplyView, rtt_ms: f64, addr: IpAddr) {
        let description = describe(reply.icmp_type, reply.icmp_code);
        let status = if reply.is_valid { "[VALID]" } else { "[INVALID]" };
        println!(
            "  TTL={}    RTT={rtt_ms:.0} ms    Type={}    Code={}    {description}    Identifier={}    Sequence Number={}    {addr}    {status}",
            reply.ip_ttl, reply.icmp_type, reply.icmp_code, reply.identifier, reply.sequence,
        );
        if !reply.is_valid {
            println!(
                "    Validation Details - ID Valid: {}, Seq Valid: {}, Data Valid: {}, Type Valid: {}, Code Valid: {}",
                reply.identifier_valid,
                reply.sequence_valid,
                reply.payload_valid,
                reply.type_valid,
                reply.code_valid,
            );
        }
    }

    fn report_hop(&self, icmp_type: u8, icmp_code: u8, description: &str, rtt_ms: f64, addr: IpAddr, ttl: u32) {
        println!(
            "  TTL={ttl}    RTT={rtt_ms:.0} ms    Type={icmp_type}    Code={icmp_code}    {addr}    ({description})"
        );
    }

    fn report_unknown(&self, icmp_type: u8, rtt_ms: f64, addr: IpAddr, ttl: u32) {
        println!(
            "  TTL={ttl}    RTT={rtt_ms:.0} ms    Type={icmp_type}    Code=?    {addr}    (Unknown ICMP Type)"
        );
    }
}

fn is_timeout(error: &std::io::Error) -> bool {
    matches!(
        error.kind(),
        std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
    )
}

/// Maps a platform `ENETUNREACH`-family error code onto the portable
/// "network unreachable" classification the design notes call for, instead
/// of the source's Windows-specific `winerror == 10051` check.
fn is_network_unreachable(error: &std::io::Error) -> bool {
    match error.raw_os_error() {
        Some(101) => true,  // Linux ENETUNREACH
        Some(51) => true,   // BSD/macOS ENETUNREACH
        Some(10051) => true, // Windows WSAENETUNREACH
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{MockFactory, MockTransport};
    use std::net::Ipv4Addr;

    fn ip_header() -> Vec<u8> {
        vec![0u8; 20]
    }

    #[test]
    fn echo_reply_is_dispatched_and_validated() {
        let request = EchoRequest::build_at(0x1234, 1, 5.0);
        let mut raw = ip_header();
        raw.push(0); // type
        raw.push(0); // code
        raw.extend_from_slice(&[0, 0]);
        raw.extend_from_slice(&request.identifier.to_be_bytes());
        raw.extend_from_slice(&request.sequence.to_be_bytes());
        raw.extend_from_slice(&request.timestamp.to_le_bytes());
        raw.extend_from_slice(request.payload.as_bytes());

        let transport = MockTransport::with_reply(raw);
        let probe = RawSocketProbe::new(MockFactory(transport), ProbeConfig::default());

        let result = probe.send_echo_request(&request, IpAddr::V4(Ipv4Addr::LOCALHOST), 64);
        match result {
            ProbeResult::EchoReply { reply, .. } => assert!(reply.is_valid),
            other => panic!("expected echo reply, got {other:?}"),
        }
    }

    #[test]
    fn timeout_yields_no_result() {
        let request = EchoRequest::build_at(1, 1, 1.0);
        let transport = MockTransport::timing_out();
        let probe = RawSocketProbe::new(MockFactory(transport), ProbeConfig::default());

        let result = probe.send_echo_request(&request, IpAddr::V4(Ipv4Addr::LOCALHOST), 64);
        assert!(matches!(result, ProbeResult::NoResult));
    }

    #[test]
    fn time_exceeded_is_reported_as_hop() {
        let request = EchoRequest::build_at(1, 1, 1.0);
        let mut raw = ip_header();
        raw.push(11); // type: time exceeded
        raw.push(0);
        raw.extend_from_slice(&[0, 0, 0, 0, 0, 0]);

        let transport = MockTransport::with_reply(raw);
        let probe = RawSocketProbe::new(MockFactory(transport), ProbeConfig::default());

        let result = probe.send_echo_request(&request, IpAddr::V4(Ipv4Addr::LOCALHOST), 1);
        match result {
            ProbeResult::Hop { icmp_type, icmp_code, .. } => {
                assert_eq!(icmp_type, 11);
                assert_eq!(icmp_code, 0);
            }
            other => panic!("expected hop result, got {other:?}"),
        }
    }
}
