//! DNS plumbing: the A/AAAA wire codec and a UDP stub resolver implementing
//! [`Resolve`](netsock_common::network::resolve::Resolve).

pub mod dns;
pub mod resolver;

pub use resolver::DnsResolver;
