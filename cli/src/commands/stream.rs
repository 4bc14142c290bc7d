use colored::*;
use netsock_common::network::endpoint::Endpoint;
use netsock_common::network::resolve::Resolve;
use netsock_common::{info, success, warn};
use netsock_core::socket::flags::SO_REUSEADDR;
use netsock_core::socket::{DEFAULT_READ_LEN, ShutdownMode};
use netsock_core::{Domain, Level, ReadMode, Socket, SocketType};

use crate::terminal::print;

pub fn connect(target: &str, message: Option<&str>, resolver: &dyn Resolve) -> anyhow::Result<()> {
    let endpoint: Endpoint = Endpoint::parse_with(target, resolver)?;
    let socket: Socket = tcp_socket(&endpoint)?;

    socket.connect(&endpoint)?;
    success!("connected to {}", endpoint.to_string().green());

    if let Some(message) = message {
        let sent: usize = socket.write(message.as_bytes(), None)?;
        info!("sent {sent} bytes");
        if let Err(reason) = half_close(&socket) {
            warn!("could not signal end of message ({reason}), the reply may never come");
        }
    }

    let reply: Vec<u8> = socket.read(DEFAULT_READ_LEN, ReadMode::Binary)?;
    if reply.is_empty() {
        info!("peer closed the connection without replying");
    } else {
        print::header("reply");
        print::print(&String::from_utf8_lossy(&reply));
    }
    Ok(())
}

pub fn listen(local: &str, resolver: &dyn Resolve) -> anyhow::Result<()> {
    let endpoint: Endpoint = Endpoint::parse_with(local, resolver)?;
    let listener: Socket = tcp_socket(&endpoint)?;

    listener.set_option(Level::Socket, SO_REUSEADDR, 1)?;
    listener.bind(&endpoint)?;
    listener.listen(1)?;
    info!("listening on {}", endpoint.to_string().bold());

    let mut peer: Socket = listener.accept()?;
    let remote = peer.remote_endpoint()?;
    success!("accepted {}", remote.to_string().green());

    let received: Vec<u8> = peer.read(DEFAULT_READ_LEN, ReadMode::Binary)?;
    let echoed: usize = peer.write(&received, None)?;
    info!("echoed {echoed} bytes back to {remote}");

    peer.close();
    Ok(())
}

/// Shuts down the sending side so the peer sees end of stream.
fn half_close(socket: &Socket) -> Result<(), String> {
    if socket.shutdown(ShutdownMode::Write) {
        return Ok(());
    }
    Err(Socket::error_message(socket.last_error()))
}

fn tcp_socket(endpoint: &Endpoint) -> anyhow::Result<Socket> {
    let domain: Domain = endpoint.inet_address().address_family().into();
    Ok(Socket::create(domain, SocketType::Stream, Level::Tcp)?)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
