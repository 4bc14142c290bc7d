//! # Network Endpoints
//!
//! An [`Endpoint`] pairs an [`InetAddress`] with a port in `1..=65535`.
//!
//! Accepted text forms:
//! * **`HOST:PORT`**: e.g. `127.0.0.1:8080`, `localhost:22`, `::1:443`.
//! * **`[HOST]:PORT`**: e.g. `[::1]:443`.
//!
//! `HOST` is made of ASCII letters, digits, `_`, `-`, `.` and `:`, and must be
//! an address literal or a resolvable hostname. `PORT` is one or more ASCII digits.
//! The brackets are each optional, exactly like `^\[?([\w\-.:]+)]?:(\d+)$`.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::error::{AddressError, EndpointFault};
use crate::network::address::InetAddress;
use crate::network::resolve::{Resolve, SystemResolver};

pub const MIN_PORT: u32 = 1;
pub const MAX_PORT: u32 = u16::MAX as u32;

/// An immutable (address, port) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    inet_address: InetAddress,
    port: u16,
}

impl Endpoint {
    /// Fails with [`AddressError::InvalidPort`] unless `1 <= port <= 65535`.
    pub fn new(inet_address: InetAddress, port: u32) -> Result<Self, AddressError> {
        if !(MIN_PORT..=MAX_PORT).contains(&port) {
            return Err(AddressError::InvalidPort(port.to_string()));
        }
        Ok(Self {
            inet_address,
            port: port as u16,
        })
    }

    /// Parses `HOST:PORT` or `[HOST]:PORT`, resolving `HOST` with the host resolver.
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        Self::parse_with(text, &SystemResolver)
    }

    pub fn parse_with(text: &str, resolver: &dyn Resolve) -> Result<Self, AddressError> {
        let invalid = |reason: EndpointFault| AddressError::InvalidEndpoint {
            input: text.to_string(),
            reason,
        };

        let (host, port) = split_endpoint(text).ok_or_else(|| invalid(EndpointFault::Syntax))?;

        // Digits only, so the only failure left is overflow.
        let port: u32 = port
            .parse()
            .map_err(|_| AddressError::InvalidPort(port.to_string()))?;
        if !(MIN_PORT..=MAX_PORT).contains(&port) {
            return Err(AddressError::InvalidPort(port.to_string()));
        }

        let inet_address = InetAddress::from_input_with(host, resolver)
            .ok_or_else(|| invalid(EndpointFault::Unresolved))?;

        Self::new(inet_address, port)
    }

    pub fn inet_address(&self) -> &InetAddress {
        &self.inet_address
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn to_socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.inet_address.ip(), self.port)
    }
}

/// Splits `text` into its host and port components without validating either semantically.
fn split_endpoint(text: &str) -> Option<(&str, &str)> {
    let rest: &str = text.strip_prefix('[').unwrap_or(text);
    let (host, port) = rest.rsplit_once(':')?;
    let host: &str = host.strip_suffix(']').unwrap_or(host);

    let is_host_char = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':');
    if host.is_empty() || !host.chars().all(is_host_char) {
        return None;
    }
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((host, port))
}

impl TryFrom<SocketAddr> for Endpoint {
    type Error = AddressError;

    fn try_from(addr: SocketAddr) -> Result<Self, Self::Error> {
        Self::new(InetAddress::from(addr.ip()), u32::from(addr.port()))
    }
}

impl FromStr for Endpoint {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.inet_address, self.port)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
