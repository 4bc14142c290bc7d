use std::sync::Arc;
use std::time::Duration;

use netsock_common::error::ResolveError;
use netsock_common::network::address::InetAddress;
use netsock_common::network::resolve::Resolve;
use tokio::time::timeout;
use tracing::debug;

/// Resolves every A and AAAA address of `hostname` on the blocking pool,
/// giving up after `limit`.
///
/// A lookup that times out keeps running on its blocking thread, its result
/// is discarded.
pub async fn lookup_with_timeout(
    hostname: &str,
    resolver: Arc<dyn Resolve>,
    limit: Duration,
) -> Result<Vec<InetAddress>, ResolveError> {
    let name: String = hostname.to_string();
    let task = tokio::task::spawn_blocking(move || InetAddress::lookup_all_with(&name, resolver.as_ref()));

    match timeout(limit, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join)) => Err(ResolveError::Io(std::io::Error::other(join.to_string()))),
        Err(_elapsed) => Err(ResolveError::Timeout(limit)),
    }
}

/// Like [`InetAddress::all_by_hostname_with`], bounded by `limit`: failures
/// and timeouts yield an empty list.
pub async fn all_by_hostname_with_timeout(
    hostname: &str,
    resolver: Arc<dyn Resolve>,
    limit: Duration,
) -> Vec<InetAddress> {
    if hostname.trim().is_empty() {
        return Vec::new();
    }

    match lookup_with_timeout(hostname, resolver, limit).await {
        Ok(addresses) => addresses,
        Err(e) => {
            debug!("lookup for {hostname} gave up: {e}");
            Vec::new()
        }
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
