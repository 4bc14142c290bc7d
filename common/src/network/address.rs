//! # Internet Addresses
//!
//! [`InetAddress`] is a validated IPv4 or IPv6 address, optionally tagged with
//! the hostname it was resolved from.
//!
//! Two kinds of constructor exist:
//! * **Literal**: [`InetAddress::from_address`] accepts only a syntactically valid
//!   IPv4/IPv6 literal and never touches the network.
//! * **Resolving**: [`InetAddress::from_hostname`], [`InetAddress::all_by_hostname`] and
//!   [`InetAddress::from_input`] ask a [`Resolve`] implementation for A records first,
//!   then AAAA records. Resolver failures are swallowed: the caller only sees whether
//!   anything was found.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use tracing::debug;

use crate::error::{AddressError, ResolveError};
use crate::network::resolve::{RecordType, Resolve, SystemResolver};

/// Classification of an address as IPv4 or IPv6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    pub fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => AddressFamily::Ipv4,
            IpAddr::V6(_) => AddressFamily::Ipv6,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => f.write_str("IPv4"),
            AddressFamily::Ipv6 => f.write_str("IPv6"),
        }
    }
}

/// An immutable IP address, optionally annotated with the hostname it came from.
///
/// The literal a caller passed in is kept verbatim: `2001:DB8::1` stays
/// upper-case and `::0001` is not folded into `::1`. Equality compares that
/// text and the hostname, so the same IP reached through two different names,
/// or spelled two different ways, compares unequal.
#[derive(Debug, Clone)]
pub struct InetAddress {
    address: String,
    ip: IpAddr,
    hostname: Option<String>,
}

impl InetAddress {
    /// Returns `true` if `text` is an IPv4 literal. No I/O.
    pub fn is_ipv4(text: &str) -> bool {
        text.parse::<Ipv4Addr>().is_ok()
    }

    /// Returns `true` if `text` is an IPv6 literal. No I/O.
    pub fn is_ipv6(text: &str) -> bool {
        text.parse::<Ipv6Addr>().is_ok()
    }

    /// Builds an address from an IPv4 or IPv6 literal.
    pub fn from_address(text: &str) -> Result<Self, AddressError> {
        let ip: IpAddr = text
            .parse()
            .map_err(|_| AddressError::InvalidAddress(text.to_string()))?;
        Ok(Self {
            address: text.to_string(),
            ip,
            hostname: None,
        })
    }

    /// First address the host resolver returns for `hostname`.
    pub fn from_hostname(hostname: &str) -> Option<Self> {
        Self::from_hostname_with(hostname, &SystemResolver)
    }

    pub fn from_hostname_with(hostname: &str, resolver: &dyn Resolve) -> Option<Self> {
        Self::all_by_hostname_with(hostname, resolver).into_iter().next()
    }

    /// Every address of `hostname`: A records, then AAAA records.
    ///
    /// Resolver failures yield an empty sequence.
    pub fn all_by_hostname(hostname: &str) -> Vec<Self> {
        Self::all_by_hostname_with(hostname, &SystemResolver)
    }

    /// Same as [`InetAddress::all_by_hostname`] with an explicit resolver.
    ///
    /// Each record type is looked up independently; a failing A lookup does not
    /// hide the AAAA results and vice versa.
    pub fn all_by_hostname_with(hostname: &str, resolver: &dyn Resolve) -> Vec<Self> {
        if hostname.trim().is_empty() {
            return Vec::new();
        }

        let mut addresses: Vec<Self> = Vec::new();
        for record in RecordType::ALL {
            match resolver.lookup(hostname, record) {
                Ok(ips) => addresses.extend(Self::tagged(hostname, ips)),
                Err(e) => debug!("{record:?} lookup for {hostname} failed: {e}"),
            }
        }
        addresses
    }

    /// Like [`InetAddress::all_by_hostname_with`], but reports the first resolver failure.
    pub fn lookup_all_with(hostname: &str, resolver: &dyn Resolve) -> Result<Vec<Self>, ResolveError> {
        let mut addresses: Vec<Self> = Vec::new();
        for record in RecordType::ALL {
            let ips = resolver.lookup(hostname, record)?;
            addresses.extend(Self::tagged(hostname, ips));
        }
        Ok(addresses)
    }

    /// Literal parsing first, hostname resolution as the fallback.
    pub fn from_input(input: &str) -> Option<Self> {
        Self::from_input_with(input, &SystemResolver)
    }

    pub fn from_input_with(input: &str, resolver: &dyn Resolve) -> Option<Self> {
        if Self::is_ipv4(input) || Self::is_ipv6(input) {
            Self::from_address(input).ok()
        } else {
            Self::from_hostname_with(input, resolver)
        }
    }

    pub fn ip(&self) -> IpAddr {
        self.ip
    }

    /// The address literal, exactly as given or as the resolver produced it.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn address_family(&self) -> AddressFamily {
        AddressFamily::of(&self.ip)
    }

    /// Hostname this address was resolved from, or `""` for literals.
    pub fn hostname(&self) -> &str {
        self.hostname.as_deref().unwrap_or("")
    }

    fn tagged(hostname: &str, ips: Vec<IpAddr>) -> impl Iterator<Item = Self> + '_ {
        ips.into_iter().map(move |ip| Self {
            hostname: Some(hostname.to_string()),
            ..Self::from(ip)
        })
    }
}

impl From<IpAddr> for InetAddress {
    fn from(ip: IpAddr) -> Self {
        Self {
            address: ip.to_string(),
            ip,
            hostname: None,
        }
    }
}

impl PartialEq for InetAddress {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address && self.hostname == other.hostname
    }
}

impl Eq for InetAddress {}

impl Hash for InetAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address.hash(state);
        self.hostname.hash(state);
    }
}

impl FromStr for InetAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_address(s)
    }
}

impl fmt::Display for InetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
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
