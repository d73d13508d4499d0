//! `PingSession` and `TracerouteSession`: the two upper-API entry points
//! (SPEC_FULL.md S4.4/S4.5/S6) driving a sequence of probes and aggregating
//! the results.

use std::net::IpAddr;
use std::process;

use trust_dns_resolver::Resolver;

use crate::config::ProbeConfig;
use crate::error::{Error, Result};
use crate::packet::EchoRequest;
use crate::probe::{ProbeResult, RawSocketProbe};
use crate::transport::TransportFactory;

const PING_PROBE_COUNT: u16 = 4;
const MAX_CONSECUTIVE_TIMEOUTS: u32 = 10;

/// Resolves `host` to an `IpAddr`, trying a direct literal parse first and
/// falling back to DNS (mirrors the reference source's resolver usage, but
/// skips the network round trip for the common "already an IP" case).
pub fn resolve(host: &str) -> Result<IpAddr> {
    if let Ok(addr) = host.parse::<IpAddr>() {
        return Ok(addr);
    }
    let resolver = Resolver::default().map_err(|e| Error::Resolve {
        host: host.to_string(),
        source: e,
    })?;
    let lookup = resolver.lookup_ip(host).map_err(|e| Error::Resolve {
        host: host.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::Other, e),
    })?;
    lookup.iter().next().ok_or_else(|| Error::Resolve {
        host: host.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::Other, "no addresses returned"),
    })
}

fn process_identifier() -> u16 {
    (process::id() & 0xFFFF) as u16
}

/// Round-trip-time statistics for a completed ping session.
#[derive(Debug, Default, Clone)]
pub struct Statistics {
    pub sent: u32,
    pub received: u32,
    rtts: Vec<f64>,
}

impl Statistics {
    fn record_sent(&mut self) {
        self.sent += 1;
    }

    fn record_received(&mut self, rtt_ms: f64) {
        self.received += 1;
        self.rtts.push(rtt_ms);
    }

    pub fn lost(&self) -> u32 {
        self.sent - self.received
    }

    pub fn loss_percent(&self) -> f64 {
        if self.sent == 0 {
            0.0
        } else {
            (self.lost() as f64 / self.sent as f64) * 100.0
        }
    }

    pub fn min_rtt(&self) -> Option<f64> {
        self.rtts.iter().cloned().fold(None, |acc, v| {
            Some(acc.map_or(v, |a: f64| a.min(v)))
        })
    }

    pub fn max_rtt(&self) -> Option<f64> {
        self.rtts.iter().cloned().fold(None, |acc, v| {
            Some(acc.map_or(v, |a: f64| a.max(v)))
        })
    }

    pub fn avg_rtt(&self) -> Option<f64> {
        if self.rtts.is_empty() {
            None
        } else {
            Some(self.rtts.iter().sum::<f64>() / self.rtts.len() as f64)
        }
    }

    fn print_summary(&self) {
        println!(
            "Sent={}, Received={}, Lost={} ({:.1}% loss)",
            self.sent,
            self.received,
            self.lost(),
            self.loss_percent()
        );
        match (self.min_rtt(), self.max_rtt(), self.avg_rtt()) {
            (Some(min), Some(max), Some(avg)) => {
                println!(
                    "Round-trip min/avg/max = {:.0}/{:.0}/{:.0} ms",
                    min, avg, max
                );
            }
            _ => println!("No successful round-trip times recorded"),
        }
    }
}

/// Sends four fixed probes at a host and prints a summary, per SPEC_FULL.md
/// S4.4.
pub struct PingSession<F: TransportFactory> {
    probe: RawSocketProbe<F>,
}

impl<F: TransportFactory> PingSession<F> {
    pub fn new(factory: F, config: ProbeConfig) -> Self {
        PingSession {
            probe: RawSocketProbe::new(factory, config),
        }
    }

    pub fn run(&self, host: &str) -> Result<Statistics> {
        let dest = resolve(host)?;
        println!("Pinging {host} [{dest}]:");

        let identifier = process_identifier();
        let ttl = self.probe.default_ttl();
        let mut stats = Statistics::default();

        for sequence in 0..PING_PROBE_COUNT {
            let request = EchoRequest::build(identifier, sequence);
            stats.record_sent();
            match self.probe.send_echo_request(&request, dest, ttl) {
                ProbeResult::EchoReply { rtt_ms, .. } => stats.record_received(rtt_ms),
                ProbeResult::Hop { rtt_ms, .. } => stats.record_received(rtt_ms),
                ProbeResult::NoResult => {}
            }
        }

        stats.print_summary();
        Ok(stats)
    }
}

/// Runs an incrementing-TTL traceroute against a host, per SPEC_FULL.md
/// S4.5.
pub struct TracerouteSession<F: TransportFactory> {
    probe: RawSocketProbe<F>,
}

impl<F: TransportFactory> TracerouteSession<F> {
    pub fn new(factory: F, config: ProbeConfig) -> Self {
        TracerouteSession {
            probe: RawSocketProbe::new(factory, config),
        }
    }

    pub fn run(&self, host: &str) -> Result<()> {
        let dest = resolve(host)?;
        println!("Tracing route to {host} [{dest}]:");

        let identifier = process_identifier();
        let mut ttl: u32 = 1;
        let mut consecutive_timeouts: u32 = 0;

        loop {
            let request = EchoRequest::build(identifier, ttl as u16);
            match self.probe.send_echo_request(&request, dest, ttl) {
                ProbeResult::EchoReply { .. } => {
                    consecutive_timeouts = 0;
                    println!("Reached destination");
                    break;
                }
                ProbeResult::Hop { .. } => {
                    consecutive_timeouts = 0;
                }
                ProbeResult::NoResult => {
                    consecutive_timeouts += 1;
                    if consecutive_timeouts >= MAX_CONSECUTIVE_TIMEOUTS {
                        println!(
                            "Traceroute aborted after {consecutive_timeouts} consecutive timeouts"
                        );
                        break;
                    }
                }
            }
            ttl += 1;
        }

        Ok(())
    }
}
