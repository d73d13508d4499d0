//! The injectable collaborator behind [`crate::probe::RawSocketProbe`].
//! Raw ICMP sockets need elevated privileges, so the probe logic is written
//! against this trait rather than `socket2::Socket` directly — tests run a
//! [`MockTransport`] instead (SPEC_FULL.md S9, "Raw sockets").

use std::io::{self, Read};
use std::net::SocketAddr;
use std::time::Duration;

use socket2::{Domain, Protocol, Socket, Type};

/// One opened, single-use transport for a probe's send/receive pair.
pub trait Transport {
    fn set_ttl(&mut self, ttl: u32) -> io::Result<()>;
    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()>;
    fn send_to(&mut self, buf: &[u8], dest: SocketAddr) -> io::Result<usize>;
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Opens a fresh [`Transport`] per probe, matching the reference source
/// creating a new socket inside every `sendEchoRequest` call.
pub trait TransportFactory {
    type Transport: Transport;

    fn open(&self) -> io::Result<Self::Transport>;
}

/// A raw ICMPv4 socket bound to an ephemeral local address.
pub struct RawIcmpSocket {
    socket: Socket,
}

impl Transport for RawIcmpSocket {
    fn set_ttl(&mut self, ttl: u32) -> io::Result<()> {
        self.socket.set_ttl(ttl)
    }

    fn set_read_timeout(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.socket.set_read_timeout(timeout)
    }

    fn send_to(&mut self, buf: &[u8], dest: SocketAddr) -> io::Result<usize> {
        self.socket.send_to(buf, &dest.into())
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.socket.read(buf)
    }
}

/// Opens [`RawIcmpSocket`]s, one per probe.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawIcmpFactory;

impl TransportFactory for RawIcmpFactory {
    type Transport = RawIcmpSocket;

    fn open(&self) -> io::Result<Self::Transport> {
        let socket = Socket::new(Domain::IPV4, Type::RAW, Some(Protocol::ICMPV4))?;
        socket.bind(&SocketAddr::from(([0, 0, 0, 0], 0)).into())?;
        Ok(RawIcmpSocket { socket })
    }
}
