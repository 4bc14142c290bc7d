use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Which resolver backs hostname lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolverKind {
    /// The host resolver (`getaddrinfo`), honouring `/etc/hosts`.
    #[default]
    System,
    /// Direct A/AAAA queries to a nameserver over UDP.
    Dns,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub resolver: ResolverKind,
    /// Nameserver for [`ResolverKind::Dns`].
    ///
    /// Falls back to the first entry of `/etc/resolv.conf` when unset.
    pub nameserver: Option<SocketAddr>,
    /// Upper bound for a single lookup.
    pub timeout: Duration,
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolver: ResolverKind::default(),
            nameserver: None,
            timeout: DEFAULT_TIMEOUT,
            verbosity: 0,
        }
    }
}
