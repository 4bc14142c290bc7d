#![cfg(test)]
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, UdpSocket};
use std::sync::Arc;
use std::time::Duration;

use netsock_common::error::{AddressError, EndpointFault, ResolveError};
use netsock_common::network::address::{AddressFamily, InetAddress};
use netsock_common::network::endpoint::Endpoint;
use netsock_common::network::resolve::StaticResolver;
use netsock_core::lookup;
use netsock_integration_tests::fake_nameserver;
use netsock_protocols::DnsResolver;

const TIMEOUT: Duration = Duration::from_secs(2);

fn zone() -> HashMap<String, Vec<IpAddr>> {
    let mut zone = HashMap::new();
    zone.insert(
        "svc.test".to_string(),
        vec![
            IpAddr::V6(Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1)),
            IpAddr::V4(Ipv4Addr::new(192, 0, 2, 10)),
            IpAddr::V4(Ipv4Addr::new(192, 0, 2, 11)),
        ],
    );
    zone.insert("v6only.test".to_string(), vec![IpAddr::V6(Ipv6Addr::LOCALHOST)]);
    zone
}

/// A records come before AAAA records regardless of zone order.
#[test]
fn dns_resolver_returns_ipv4_then_ipv6() {
    let nameserver = fake_nameserver(zone(), 2).unwrap();
    let resolver = DnsResolver::new(nameserver, TIMEOUT);

    let found: Vec<InetAddress> = InetAddress::all_by_hostname_with("svc.test", &resolver);

    let rendered: Vec<String> = found.iter().map(|a| a.address().to_string()).collect();
    assert_eq!(rendered, vec!["192.0.2.10", "192.0.2.11", "2001:db8::1"]);
    assert!(found.iter().all(|a| a.hostname() == "svc.test"));
    assert_eq!(found[2].address_family(), AddressFamily::Ipv6);
}

#[test]
fn endpoint_resolves_through_dns() {
    let nameserver = fake_nameserver(zone(), 2).unwrap();
    let resolver = DnsResolver::new(nameserver, TIMEOUT);

    let endpoint = Endpoint::parse_with("v6only.test:8443", &resolver).unwrap();

    assert_eq!(endpoint.inet_address().address(), "::1");
    assert_eq!(endpoint.inet_address().hostname(), "v6only.test");
    assert_eq!(endpoint.port(), 8443);
}

#[test]
fn unknown_names_do_not_resolve() {
    let nameserver = fake_nameserver(zone(), 2).unwrap();
    let resolver = DnsResolver::new(nameserver, TIMEOUT);

    let err = Endpoint::parse_with("nowhere.test:80", &resolver).unwrap_err();
    assert_eq!(
        err,
        AddressError::InvalidEndpoint {
            input: "nowhere.test:80".to_string(),
            reason: EndpointFault::Unresolved,
        }
    );
}

#[test]
fn bad_ports_fail_before_any_query() {
    // Zero queries: a lookup here would time out instead of failing fast.
    let nameserver = fake_nameserver(zone(), 0).unwrap();
    let resolver = DnsResolver::new(nameserver, Duration::from_millis(50));

    assert_eq!(
        Endpoint::parse_with("svc.test:70000", &resolver).unwrap_err(),
        AddressError::InvalidPort("70000".to_string())
    );
    assert_eq!(
        Endpoint::parse_with("svc.test:0", &resolver).unwrap_err(),
        AddressError::InvalidPort("0".to_string())
    );
}

#[test]
fn static_resolver_backs_endpoint_parsing() {
    let resolver = StaticResolver::new().with_host("Cache.Internal", IpAddr::V4(Ipv4Addr::new(10, 1, 2, 3)));

    let endpoint = Endpoint::parse_with("cache.internal:6379", &resolver).unwrap();
    assert_eq!(endpoint.to_string(), "10.1.2.3:6379");

    let literal = Endpoint::parse_with("[fe80::1]:22", &resolver).unwrap();
    assert_eq!(literal.inet_address().hostname(), "");
    assert_eq!(literal.to_string(), "fe80::1:22");
}

#[tokio::test]
async fn timed_lookup_through_dns() {
    let nameserver = fake_nameserver(zone(), 2).unwrap();
    let resolver = Arc::new(DnsResolver::new(nameserver, TIMEOUT));

    let found = lookup::lookup_with_timeout("svc.test", resolver, TIMEOUT).await.unwrap();
    assert_eq!(found.len(), 3);
}

#[tokio::test]
async fn silent_nameserver_surfaces_a_timeout() {
    let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
    let resolver = Arc::new(DnsResolver::new(silent.local_addr().unwrap(), Duration::from_millis(50)));

    let err = lookup::lookup_with_timeout("svc.test", resolver.clone(), TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::Timeout(_)), "{err:?}");

    let swallowed = lookup::all_by_hostname_with_timeout("svc.test", resolver, TIMEOUT).await;
    assert!(swallowed.is_empty());
}
