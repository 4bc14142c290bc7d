use std::net::IpAddr;

use anyhow::{Context, ensure};
use dns_parser::{Packet, RData, ResponseCode};
use netsock_common::network::resolve::RecordType;
use pnet::packet::dns::{DnsClass, DnsQuery, DnsType, DnsTypes, MutableDnsPacket, Opcode, Retcode};

pub const DNS_HDR_LEN: usize = 12;
pub const DNS_PORT: u16 = 53;

const MAX_LABEL_LEN: usize = 63;
const MAX_NAME_LEN: usize = 253;

/// Addresses carried by a single DNS response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsAnswer {
    pub id: u16,
    pub rcode: ResponseCode,
    pub addresses: Vec<IpAddr>,
}

impl DnsAnswer {
    /// The response code when the server refused to answer. NXDOMAIN is an
    /// answer (no addresses), not a refusal.
    pub fn refusal(&self) -> Option<ResponseCode> {
        match self.rcode {
            ResponseCode::NoError | ResponseCode::NameError => None,
            code => Some(code),
        }
    }
}

pub fn query_type(record: RecordType) -> DnsType {
    match record {
        RecordType::A => DnsTypes::A,
        RecordType::Aaaa => DnsTypes::AAAA,
    }
}

pub fn create_query_packet(hostname: &str, record: RecordType, id: u16) -> anyhow::Result<Vec<u8>> {
    let query: DnsQuery = create_query(hostname, record)?;

    let mut buffer: Vec<u8> = vec![0u8; DNS_HDR_LEN];
    write_query_header(&mut buffer, id)?;

    buffer.extend_from_slice(&query.qname);
    buffer.extend_from_slice(&query.qtype.0.to_be_bytes());
    buffer.extend_from_slice(&query.qclass.0.to_be_bytes());
    Ok(buffer)
}

/// Fills `header` as a recursive standard query carrying one question.
fn write_query_header(header: &mut [u8], id: u16) -> anyhow::Result<()> {
    let mut dns: MutableDnsPacket = MutableDnsPacket::new(header).context("creating dns header")?;
    dns.set_id(id);
    dns.set_opcode(Opcode::StandardQuery);
    dns.set_is_recursion_desirable(1);
    dns.set_rcode(Retcode::NoError);
    dns.set_query_count(1);
    Ok(())
}

/// Extracts the A and AAAA answers of a response, in wire order.
///
/// Only a packet that is not a response at all is an error; failure codes are
/// reported through [`DnsAnswer::refusal`] so the caller can match the id first.
pub fn get_addresses(payload: &[u8]) -> anyhow::Result<DnsAnswer> {
    let packet = Packet::parse(payload).context("failed to parse DNS response")?;
    ensure!(!packet.header.query, "expected a response, got a query");

    let id: u16 = packet.header.id;
    let rcode: ResponseCode = packet.header.response_code;
    if rcode != ResponseCode::NoError {
        return Ok(DnsAnswer { id, rcode, addresses: Vec::new() });
    }

    let addresses: Vec<IpAddr> = packet
        .answers
        .iter()
        .filter_map(|record| match &record.data {
            RData::A(a) => Some(IpAddr::V4(a.0)),
            RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
            _ => None,
        })
        .collect();

    Ok(DnsAnswer { id, rcode, addresses })
}

fn create_query(hostname: &str, record: RecordType) -> anyhow::Result<DnsQuery> {
    let qname: Vec<u8> = encode_dns_name(hostname)?;
    let query: DnsQuery = DnsQuery {
        qname,
        qtype: query_type(record),
        qclass: DnsClass(1),
        payload: Vec::new(),
    };
    Ok(query)
}

fn encode_dns_name(name: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed: &str = name.trim_end_matches('.');
    ensure!(!trimmed.is_empty(), "empty hostname");
    ensure!(trimmed.len() <= MAX_NAME_LEN, "hostname longer than {MAX_NAME_LEN} bytes");

    let mut encoded: Vec<u8> = Vec::new();
    for label in trimmed.split('.') {
        ensure!(!label.is_empty(), "empty label in {name}");
        ensure!(label.len() <= MAX_LABEL_LEN, "label '{label}' longer than {MAX_LABEL_LEN} bytes");
        encoded.push(label.len() as u8);
        encoded.extend_from_slice(label.as_bytes());
    }
    encoded.push(0);
    Ok(encoded)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
