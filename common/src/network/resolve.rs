//! # Hostname Resolution
//!
//! The [`Resolve`] trait is the only seam between the address types and the
//! outside world. Lookups are issued one record type at a time so callers can
//! reproduce "A records first, then AAAA records" ordering regardless of the
//! backend.

use std::collections::HashMap;
use std::net::{IpAddr, ToSocketAddrs};

use crate::error::ResolveError;

/// DNS record types mapping a hostname to an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
}

impl RecordType {
    /// Lookup order used when collecting every address of a host.
    pub const ALL: [RecordType; 2] = [RecordType::A, RecordType::Aaaa];

    pub fn matches(&self, ip: &IpAddr) -> bool {
        match self {
            RecordType::A => ip.is_ipv4(),
            RecordType::Aaaa => ip.is_ipv6(),
        }
    }
}

/// Something that can turn a hostname into addresses of one record type.
pub trait Resolve: Send + Sync {
    fn lookup(&self, hostname: &str, record: RecordType) -> Result<Vec<IpAddr>, ResolveError>;
}

impl<R: Resolve + ?Sized> Resolve for Box<R> {
    fn lookup(&self, hostname: &str, record: RecordType) -> Result<Vec<IpAddr>, ResolveError> {
        (**self).lookup(hostname, record)
    }
}

impl<R: Resolve + ?Sized> Resolve for std::sync::Arc<R> {
    fn lookup(&self, hostname: &str, record: RecordType) -> Result<Vec<IpAddr>, ResolveError> {
        (**self).lookup(hostname, record)
    }
}

/// The host resolver, reached through `getaddrinfo`.
///
/// Blocks the calling thread for as long as the host resolver does.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl Resolve for SystemResolver {
    fn lookup(&self, hostname: &str, record: RecordType) -> Result<Vec<IpAddr>, ResolveError> {
        let resolved = (hostname, 0).to_socket_addrs()?;
        let mut addrs: Vec<IpAddr> = Vec::new();
        for ip in resolved.map(|addr| addr.ip()).filter(|ip| record.matches(ip)) {
            if !addrs.contains(&ip) {
                addrs.push(ip);
            }
        }
        Ok(addrs)
    }
}

/// A fixed host table, in the spirit of `/etc/hosts`.
///
/// Unknown names resolve to nothing rather than failing.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    table: HashMap<String, Vec<IpAddr>>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, hostname: &str, ip: IpAddr) -> Self {
        self.insert(hostname, ip);
        self
    }

    pub fn insert(&mut self, hostname: &str, ip: IpAddr) {
        let entry = self.table.entry(hostname.to_ascii_lowercase()).or_default();
        if !entry.contains(&ip) {
            entry.push(ip);
        }
    }
}

impl Resolve for StaticResolver {
    fn lookup(&self, hostname: &str, record: RecordType) -> Result<Vec<IpAddr>, ResolveError> {
        let addrs = self
            .table
            .get(&hostname.to_ascii_lowercase())
            .map(|ips| ips.iter().copied().filter(|ip| record.matches(ip)).collect())
            .unwrap_or_default();
        Ok(addrs)
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn record_type_matches_family() {
        let v4 = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let v6 = IpAddr::V6(Ipv6Addr::LOCALHOST);
        assert!(RecordType::A.matches(&v4));
        assert!(!RecordType::A.matches(&v6));
        assert!(RecordType::Aaaa.matches(&v6));
        assert!(!RecordType::Aaaa.matches(&v4));
    }

    #[test]
    fn static_resolver_splits_by_record_type() {
        let resolver = StaticResolver::new()
            .with_host("db.internal", IpAddr::V6(Ipv6Addr::LOCALHOST))
            .with_host("db.internal", IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)));

        let a = resolver.lookup("DB.internal", RecordType::A).unwrap();
        let aaaa = resolver.lookup("db.internal", RecordType::Aaaa).unwrap();

        assert_eq!(a, vec![IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7))]);
        assert_eq!(aaaa, vec![IpAddr::V6(Ipv6Addr::LOCALHOST)]);
        assert!(resolver.lookup("unknown", RecordType::A).unwrap().is_empty());
    }

    #[test]
    fn system_resolver_passes_literals_through() {
        let addrs = SystemResolver.lookup("127.0.0.1", RecordType::A).unwrap();
        assert_eq!(addrs, vec![IpAddr::V4(Ipv4Addr::LOCALHOST)]);
        assert!(SystemResolver.lookup("127.0.0.1", RecordType::Aaaa).unwrap().is_empty());
    }
}
