//! Shared fixtures for the integration suites.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr, UdpSocket};
use std::thread;
use std::time::Duration;

use netsock_common::network::address::InetAddress;
use netsock_common::network::endpoint::Endpoint;
use netsock_core::{Domain, Level, Socket, SocketType};

const RECORD_A: u16 = 1;
const RECORD_AAAA: u16 = 28;

pub fn loopback_v4() -> InetAddress {
    InetAddress::from(IpAddr::from([127, 0, 0, 1]))
}

/// A listening TCP socket on an ephemeral loopback port and its endpoint.
pub fn tcp_listener() -> anyhow::Result<(Socket, Endpoint)> {
    let listener = Socket::create(Domain::Inet, SocketType::Stream, Level::Tcp)?;
    listener.bind_any(&loopback_v4())?;
    listener.listen(4)?;
    let endpoint = listener.local_endpoint()?;
    Ok((listener, endpoint))
}

pub fn udp_socket() -> anyhow::Result<(Socket, Endpoint)> {
    let socket = Socket::create(Domain::Inet, SocketType::Datagram, Level::Udp)?;
    socket.bind_any(&loopback_v4())?;
    let endpoint = socket.local_endpoint()?;
    Ok((socket, endpoint))
}

/// A UDP nameserver on loopback answering A/AAAA queries from `zone`.
///
/// Unknown names get NXDOMAIN. The server thread stops after `queries`
/// requests or one second of silence.
pub fn fake_nameserver(zone: HashMap<String, Vec<IpAddr>>, queries: usize) -> anyhow::Result<SocketAddr> {
    let server = UdpSocket::bind("127.0.0.1:0")?;
    server.set_read_timeout(Some(Duration::from_secs(1)))?;
    let addr = server.local_addr()?;

    thread::spawn(move || {
        let mut buf = [0u8; 512];
        for _ in 0..queries {
            let Ok((len, peer)) = server.recv_from(&mut buf) else {
                return;
            };
            if let Some(response) = answer(&buf[..len], &zone) {
                let _ = server.send_to(&response, peer);
            }
        }
    });
    Ok(addr)
}

fn answer(query: &[u8], zone: &HashMap<String, Vec<IpAddr>>) -> Option<Vec<u8>> {
    let (name, end) = question_name(query)?;
    let qtype = u16::from_be_bytes([*query.get(end)?, *query.get(end + 1)?]);
    let question_end = end + 4;

    let mut out: Vec<u8> = query.get(..question_end)?.to_vec();
    out[2] = 0x81;
    out[3] = 0x80;

    let Some(ips) = zone.get(&name) else {
        out[3] |= 3;
        return Some(out);
    };

    let records: Vec<(u16, Vec<u8>)> = ips
        .iter()
        .filter_map(|ip| match ip {
            IpAddr::V4(v4) if qtype == RECORD_A => Some((RECORD_A, v4.octets().to_vec())),
            IpAddr::V6(v6) if qtype == RECORD_AAAA => Some((RECORD_AAAA, v6.octets().to_vec())),
            _ => None,
        })
        .collect();

    out[6..8].copy_from_slice(&(records.len() as u16).to_be_bytes());
    for (rtype, data) in records {
        out.extend_from_slice(&[0xC0, 0x0C]);
        out.extend_from_slice(&rtype.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
        out.extend_from_slice(&60u32.to_be_bytes());
        out.extend_from_slice(&(data.len() as u16).to_be_bytes());
        out.extend_from_slice(&data);
    }
    Some(out)
}

/// Decodes the uncompressed question name, returning it with the offset of QTYPE.
fn question_name(query: &[u8]) -> Option<(String, usize)> {
    let mut labels: Vec<String> = Vec::new();
    let mut pos: usize = 12;
    loop {
        let len = *query.get(pos)? as usize;
        pos += 1;
        if len == 0 {
            break;
        }
        let label = query.get(pos..pos + len)?;
        labels.push(String::from_utf8_lossy(label).to_ascii_lowercase());
        pos += len;
    }
    Some((labels.join("."), pos))
}
