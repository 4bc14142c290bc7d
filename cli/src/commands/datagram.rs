use colored::*;
use netsock_common::network::endpoint::Endpoint;
use netsock_common::network::resolve::Resolve;
use netsock_common::{info, success};
use netsock_core::socket::DEFAULT_READ_LEN;
use netsock_core::{Domain, Level, Socket, SocketType};

use crate::terminal::print;

pub fn send(target: &str, text: &str, resolver: &dyn Resolve) -> anyhow::Result<()> {
    let endpoint: Endpoint = Endpoint::parse_with(target, resolver)?;
    let socket: Socket = udp_socket(&endpoint)?;

    let sent: usize = socket.send_to(&endpoint, text.as_bytes(), None, 0)?;
    success!("sent {} bytes to {}", sent, endpoint.to_string().green());
    Ok(())
}

pub fn receive(local: &str, resolver: &dyn Resolve) -> anyhow::Result<()> {
    let endpoint: Endpoint = Endpoint::parse_with(local, resolver)?;
    let socket: Socket = udp_socket(&endpoint)?;

    socket.bind(&endpoint)?;
    info!("waiting for a datagram on {}", endpoint.to_string().bold());

    let (data, from) = socket.receive_from(DEFAULT_READ_LEN, 0)?;
    success!("{} bytes from {}", data.len(), from.to_string().green());
    print::print(&String::from_utf8_lossy(&data));
    Ok(())
}

fn udp_socket(endpoint: &Endpoint) -> anyhow::Result<Socket> {
    let domain: Domain = endpoint.inet_address().address_family().into();
    Ok(Socket::create(domain, SocketType::Datagram, Level::Udp)?)
}
