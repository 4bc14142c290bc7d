//! A minimal stub resolver speaking DNS over UDP.
//!
//! One query per lookup, answered by a single nameserver, bounded by a timeout.
//! No retries, no caching, no TCP fallback for truncated answers.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use netsock_common::config::Config;
use netsock_common::error::ResolveError;
use netsock_common::network::resolve::{RecordType, Resolve};
use tracing::{debug, trace};

use crate::dns::{self, DNS_PORT, DnsAnswer};

pub const RESOLV_CONF: &str = "/etc/resolv.conf";
const FALLBACK_NAMESERVER: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 53)), DNS_PORT);
const MAX_UDP_PAYLOAD: usize = 4096;

#[derive(Debug, Clone, Copy)]
pub struct DnsResolver {
    nameserver: SocketAddr,
    timeout: Duration,
}

impl DnsResolver {
    pub fn new(nameserver: SocketAddr, timeout: Duration) -> Self {
        Self { nameserver, timeout }
    }

    /// Uses the configured nameserver, else the first one in `/etc/resolv.conf`.
    pub fn from_config(cfg: &Config) -> Self {
        let nameserver = cfg.nameserver.unwrap_or_else(system_nameserver);
        Self::new(nameserver, cfg.timeout)
    }

    pub fn nameserver(&self) -> SocketAddr {
        self.nameserver
    }

    fn exchange(&self, query: &[u8], id: u16) -> Result<DnsAnswer, ResolveError> {
        let bind_addr: SocketAddr = match self.nameserver {
            SocketAddr::V4(_) => SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0),
            SocketAddr::V6(_) => SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0),
        };
        let socket = UdpSocket::bind(bind_addr)?;
        socket.connect(self.nameserver)?;
        socket.send(query)?;

        let deadline: Instant = Instant::now() + self.timeout;
        let mut buffer = [0u8; MAX_UDP_PAYLOAD];
        loop {
            let remaining: Duration = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(ResolveError::Timeout(self.timeout));
            }
            socket.set_read_timeout(Some(remaining))?;

            let len: usize = match socket.recv(&mut buffer) {
                Ok(len) => len,
                Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) => {
                    return Err(ResolveError::Timeout(self.timeout));
                }
                Err(e) => return Err(e.into()),
            };

            let answer: DnsAnswer =
                dns::get_addresses(&buffer[..len]).map_err(|e| ResolveError::Malformed(e.to_string()))?;
            if answer.id != id {
                trace!("dropping stray answer {} (waiting for {id})", answer.id);
                continue;
            }
            return match answer.refusal() {
                Some(code) => Err(ResolveError::Rejected(format!("server answered {code:?}"))),
                None => Ok(answer),
            };
        }
    }
}

impl Resolve for DnsResolver {
    fn lookup(&self, hostname: &str, record: RecordType) -> Result<Vec<IpAddr>, ResolveError> {
        let id: u16 = rand::random();
        let query: Vec<u8> = dns::create_query_packet(hostname, record, id)
            .map_err(|e| ResolveError::Rejected(e.to_string()))?;

        debug!("querying {} for {record:?} {hostname}", self.nameserver);
        let answer: DnsAnswer = self.exchange(&query, id)?;

        // CNAME chains may pull records of the other family into the answer.
        Ok(answer
            .addresses
            .into_iter()
            .filter(|ip| record.matches(ip))
            .collect())
    }
}

/// First nameserver listed in `/etc/resolv.conf`, or the local stub resolver.
pub fn system_nameserver() -> SocketAddr {
    std::fs::read_to_string(RESOLV_CONF)
        .ok()
        .and_then(|contents| parse_resolv_conf(&contents))
        .unwrap_or(FALLBACK_NAMESERVER)
}

pub fn parse_resolv_conf(contents: &str) -> Option<SocketAddr> {
    contents.lines().find_map(|line| {
        let mut fields = line.split_whitespace();
        if fields.next() != Some("nameserver") {
            return None;
        }
        // Scoped IPv6 nameservers ("fe80::1%eth0") are not reachable without the scope id.
        let ip: IpAddr = fields.next()?.parse().ok()?;
        Some(SocketAddr::new(ip, DNS_PORT))
    })
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
    use crate::dns::tests::response_for;
    use std::thread;

    /// Answers exactly one query with `answers`, echoing the query id.
    fn one_shot_server(answers: Vec<IpAddr>) -> (SocketAddr, thread::JoinHandle<()>) {
        scripted_server(vec![(false, 0, answers)])
    }

    /// Receives one query and sends every `(stray, rcode, answers)` reply in
    /// order. Stray replies carry a different id than the query.
    fn scripted_server(replies: Vec<(bool, u8, Vec<IpAddr>)>) -> (SocketAddr, thread::JoinHandle<()>) {
        let server = UdpSocket::bind("127.0.0.1:0").unwrap();
        let addr = server.local_addr().unwrap();
        let handle = thread::spawn(move || {
            let mut buf = [0u8; 512];
            let (len, peer) = server.recv_from(&mut buf).unwrap();
            for (stray, rcode, answers) in replies {
                let mut response = response_for(&buf[..len], rcode, &answers);
                if stray {
                    response[0] ^= 0xFF;
                }
                server.send_to(&response, peer).unwrap();
            }
        });
        (addr, handle)
    }

    #[test]
    fn test_parse_resolv_conf() {
        let conf = "# generated\nsearch lan\nnameserver 192.168.0.1\nnameserver 1.1.1.1\n";
        assert_eq!(parse_resolv_conf(conf), Some("192.168.0.1:53".parse().unwrap()));

        let v6 = "options edns0\nnameserver 2001:4860:4860::8888";
        assert_eq!(parse_resolv_conf(v6), Some("[2001:4860:4860::8888]:53".parse().unwrap()));

        assert_eq!(parse_resolv_conf("nameserver fe80::1%eth0\n"), None);
        assert_eq!(parse_resolv_conf(""), None);
    }

    #[test]
    fn from_config_prefers_explicit_nameserver() {
        let cfg = Config {
            nameserver: Some("10.0.0.53:5353".parse().unwrap()),
            ..Config::default()
        };
        assert_eq!(DnsResolver::from_config(&cfg).nameserver(), "10.0.0.53:5353".parse().unwrap());
    }

    #[test]
    fn lookup_filters_by_record_type() {
        let v4 = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1));
        let v6 = IpAddr::V6(Ipv6Addr::LOCALHOST);
        let (addr, handle) = one_shot_server(vec![v4, v6]);

        let resolver = DnsResolver::new(addr, Duration::from_secs(2));
        let found = resolver.lookup("example.test", RecordType::A).unwrap();
        handle.join().unwrap();

        assert_eq!(found, vec![v4]);
    }

    #[test]
    fn lookup_times_out_on_silent_server() {
        let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
        let resolver = DnsResolver::new(silent.local_addr().unwrap(), Duration::from_millis(100));

        let err = resolver.lookup("example.test", RecordType::A).unwrap_err();
        assert!(matches!(err, ResolveError::Timeout(_)), "{err:?}");
    }

    #[test]
    fn failure_codes_are_rejections() {
        let (addr, handle) = scripted_server(vec![(false, 2, Vec::new())]);
        let resolver = DnsResolver::new(addr, Duration::from_secs(2));

        let err = resolver.lookup("example.test", RecordType::A).unwrap_err();
        handle.join().unwrap();

        assert!(matches!(err, ResolveError::Rejected(ref msg) if msg.contains("ServerFailure")), "{err:?}");
    }

    #[test]
    fn stray_failures_do_not_abort_the_wait() {
        let v4 = IpAddr::V4(Ipv4Addr::new(192, 0, 2, 7));
        let (addr, handle) = scripted_server(vec![(true, 5, Vec::new()), (false, 0, vec![v4])]);
        let resolver = DnsResolver::new(addr, Duration::from_secs(2));

        let found = resolver.lookup("example.test", RecordType::A).unwrap();
        handle.join().unwrap();

        assert_eq!(found, vec![v4]);
    }

    #[test]
    #[ignore]
    fn lookup_against_system_nameserver() {
        let resolver = DnsResolver::new(system_nameserver(), Duration::from_secs(3));
        let found = resolver.lookup("one.one.one.one", RecordType::A).unwrap();
        assert!(!found.is_empty());
    }
}
