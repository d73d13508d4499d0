use std::time::Duration;

use clap::{App, Arg};

use icmp_core::{PingSession, ProbeConfig, RawIcmpFactory, TracerouteSession};

fn main() {
    let matches = App::new("ping")
        .about("Ping or traceroute a remote host (ipv4 or hostname).")
        .version("0.1.0")
        .subcommand(
            App::new("ping")
                .about("Send echo requests to a host")
                .arg(Arg::new("HOST").takes_value(true).required(true))
                .arg(
                    Arg::new("TIMEOUT")
                        .short('t')
                        .long("timeout")
                        .takes_value(true)
                        .help("Per-probe timeout in milliseconds"),
                )
                .arg(
                    Arg::new("TTL")
                        .short('l')
                        .long("ttl")
                        .takes_value(true)
                        .help("IP time-to-live"),
                )
                .arg(
                    Arg::new("VERBOSE")
                        .short('v')
                        .long("verbose")
                        .help("Print OS-level error diagnostics"),
                ),
        )
        .subcommand(
            App::new("traceroute")
                .about("Trace the route to a host")
                .arg(Arg::new("HOST").takes_value(true).required(true))
                .arg(
                    Arg::new("TIMEOUT")
                        .short('t')
                        .long("timeout")
                        .takes_value(true)
                        .help("Per-probe timeout in milliseconds"),
                )
                .arg(
                    Arg::new("VERBOSE")
                        .short('v')
                        .long("verbose")
                        .help("Print OS-level error diagnostics"),
                ),
        )
        .get_matches();

    let result = match matches.subcommand() {
        Some(("ping", sub)) => {
            let config = config_from(sub);
            let host = sub.value_of("HOST").expect("HOST is required");
            PingSession::new(RawIcmpFactory, config).run(host).map(|_| ())
        }
        Some(("traceroute", sub)) => {
            let config = config_from(sub);
            let host = sub.value_of("HOST").expect("HOST is required");
            TracerouteSession::new(RawIcmpFactory, config).run(host)
        }
        _ => {
            eprintln!("Usage: ping <ping|traceroute> <HOST>");
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn config_from(matches: &clap::ArgMatches) -> ProbeConfig {
    let mut config = ProbeConfig::default();
    if let Some(ttl) = matches.value_of("TTL").and_then(|v| v.parse().ok()) {
        config = config.with_ttl(ttl);
    }
    if let Some(timeout_ms) = matches.value_of("TIMEOUT").and_then(|v| v.parse().ok()) {
        config.timeout = Duration::from_millis(timeout_ms);
    }
    config.verbose = matches.is_present("VERBOSE");
    config
}
