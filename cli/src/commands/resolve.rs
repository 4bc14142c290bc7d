use std::sync::Arc;

use colored::*;
use netsock_common::config::Config;
use netsock_common::network::address::{AddressFamily, InetAddress};
use netsock_common::network::resolve::Resolve;
use netsock_common::{success, warn};
use netsock_core::lookup;

use crate::terminal::print;

pub async fn resolve(host: &str, resolver: Arc<dyn Resolve>, cfg: &Config) -> anyhow::Result<()> {
    if let Ok(literal) = InetAddress::from_address(host) {
        print::header("literal address");
        print_address(&literal);
        return Ok(());
    }

    let addresses: Vec<InetAddress> = match lookup::lookup_with_timeout(host, resolver, cfg.timeout).await {
        Ok(addresses) => addresses,
        Err(e) => {
            warn!("lookup for {host} failed: {e}");
            Vec::new()
        }
    };

    print::header(&format!("addresses of {host}"));
    if addresses.is_empty() {
        print::no_results("addresses");
        return Ok(());
    }

    for address in &addresses {
        print_address(address);
    }

    let v4: usize = addresses
        .iter()
        .filter(|a| a.address_family() == AddressFamily::Ipv4)
        .count();
    success!(
        "{} resolved to {} IPv4 and {} IPv6 addresses",
        host.bold(),
        v4.to_string().green(),
        (addresses.len() - v4).to_string().green()
    );
    Ok(())
}

fn print_address(address: &InetAddress) {
    print::aligned_line(&address.address_family().to_string(), address.address().bold(), 4);
}
