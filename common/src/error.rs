use thiserror::Error;

/// Rejections raised while building an address or an endpoint.
///
/// Every variant carries the offending input so callers can report it as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The text is neither an IPv4 nor an IPv6 literal.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The port is outside `1..=65535`.
    #[error("invalid port number: {0}")]
    InvalidPort(String),

    /// The text does not follow `host:port` / `[host]:port`, or its host does not resolve.
    #[error("invalid network endpoint '{input}': {reason}")]
    InvalidEndpoint { input: String, reason: EndpointFault },
}

impl AddressError {
    pub fn is_invalid_endpoint(&self) -> bool {
        matches!(self, AddressError::InvalidEndpoint { .. })
    }
}

/// Why an endpoint string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EndpointFault {
    #[error("expected HOST:PORT or [HOST]:PORT")]
    Syntax,
    #[error("host is neither an address nor a resolvable hostname")]
    Unresolved,
}

/// Failures of a single resolver call.
///
/// The address-level operations swallow these; only
/// [`InetAddress::lookup_all_with`](crate::network::address::InetAddress::lookup_all_with)
/// surfaces them.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("resolver i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("resolver did not answer within {0:?}")]
    Timeout(std::time::Duration),

    #[error("malformed resolver response: {0}")]
    Malformed(String),

    #[error("resolver rejected the query: {0}")]
    Rejected(String),
}
