#![cfg(test)]
use std::time::Duration;

use netsock_common::network::endpoint::Endpoint;
use netsock_core::socket::flags::{SO_REUSEADDR, SO_TYPE};
use netsock_core::socket::select::DEFAULT_TIMEOUT;
use netsock_core::socket::ShutdownMode;
use netsock_core::{select, Domain, Level, ReadMode, Socket, SocketType};
use netsock_integration_tests::{tcp_listener, udp_socket};

/// A client connects to a loopback listener, sends a line, and the accepted
/// peer echoes it back after reading it in normal mode.
#[test]
fn tcp_echo_over_loopback() {
    let (listener, endpoint) = tcp_listener().unwrap();

    let client = Socket::create(Domain::Inet, SocketType::Stream, Level::Tcp).unwrap();
    client.connect(&endpoint).unwrap();
    let peer = listener.accept().unwrap();

    assert_eq!(client.write(b"ping\nrest", None).unwrap(), 9);
    let line = peer.read(64, ReadMode::Normal).unwrap();
    assert_eq!(line, b"ping\n");

    assert_eq!(peer.write(&line, None).unwrap(), 5);
    assert_eq!(client.read(64, ReadMode::Binary).unwrap(), b"ping\n");

    let remote: Endpoint = peer.remote_endpoint().unwrap();
    assert_eq!(remote, client.local_endpoint().unwrap());
}

#[test]
fn shutdown_write_signals_end_of_stream() {
    let (listener, endpoint) = tcp_listener().unwrap();
    let client = Socket::create(Domain::Inet, SocketType::Stream, Level::Tcp).unwrap();
    client.connect(&endpoint).unwrap();
    let peer = listener.accept().unwrap();

    assert!(client.shutdown(ShutdownMode::Write));
    assert!(peer.read(16, ReadMode::Binary).unwrap().is_empty());
}

/// UDP datagrams report the sender's endpoint.
#[test]
fn udp_receive_from_reports_sender() {
    let (a, a_endpoint) = udp_socket().unwrap();
    let (b, b_endpoint) = udp_socket().unwrap();

    assert_eq!(a.send_to(&b_endpoint, b"hello there", Some(5), 0).unwrap(), 5);

    let (data, from) = b.receive_from(1500, 0).unwrap();
    assert_eq!(data, b"hello");
    assert_eq!(from, a_endpoint);
}

#[test]
fn select_waits_for_the_socket_that_has_data() {
    let (a, _) = udp_socket().unwrap();
    let (b, b_endpoint) = udp_socket().unwrap();
    let (c, _) = udp_socket().unwrap();

    a.send_to(&b_endpoint, b"x", None, 0).unwrap();

    let mut read: Vec<&Socket> = vec![&a, &b, &c];
    let ready = select(Some(&mut read), None, None, Some(DEFAULT_TIMEOUT)).unwrap();

    assert_eq!(ready, 1);
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].local_endpoint().unwrap(), b_endpoint);
}

#[test]
fn select_times_out_empty() {
    let (a, _) = udp_socket().unwrap();
    let mut read: Vec<&Socket> = vec![&a];
    let ready = select(Some(&mut read), None, None, Some(Duration::from_millis(10))).unwrap();
    assert_eq!(ready, 0);
    assert!(read.is_empty());
}

#[test]
fn options_round_trip() {
    let socket = Socket::create(Domain::Inet6, SocketType::Stream, Level::Tcp).unwrap();

    socket.set_option(Level::Socket, SO_REUSEADDR, 1).unwrap();
    assert_ne!(socket.get_option(Level::Socket, SO_REUSEADDR).unwrap(), 0);
    assert_eq!(socket.get_option(Level::Socket, SO_TYPE).unwrap(), SocketType::Stream.raw());
}

#[test]
fn close_is_idempotent_and_disables_the_socket() {
    let (mut socket, endpoint) = udp_socket().unwrap();

    socket.close();
    socket.close();

    assert!(socket.is_closed());
    let err = socket.send_to(&endpoint, b"late", None, 0).unwrap_err();
    assert_eq!(err.code, libc::EBADF);
}
