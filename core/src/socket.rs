//! # Sockets
//!
//! [`Socket`] owns one native descriptor and exposes the Berkeley primitives on
//! it one-to-one. Nothing is buffered, retried or scheduled: every call goes
//! straight to the OS and a failing call comes back as a [`SocketError`]
//! carrying the OS error code.
//!
//! Addresses cross the boundary as [`Endpoint`]s; the descriptor itself is
//! managed by `socket2`.

use std::io::{self, Read, Write};
use std::mem::MaybeUninit;
use std::net::{Shutdown, SocketAddr};
use std::os::fd::{AsRawFd, RawFd};
use std::sync::atomic::{AtomicI32, Ordering};

use netsock_common::network::address::{AddressFamily, InetAddress};
use netsock_common::network::endpoint::Endpoint;
use socket2::{Domain as RawDomain, Protocol, SockAddr, Socket as RawSocket, Type};
use tracing::{debug, trace};

use crate::error::{Error, SocketError};

pub mod flags;
pub mod select;

pub const DEFAULT_READ_LEN: usize = 65535;

/// Communication domain of a socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Unix,
    Inet,
    Inet6,
}

impl Domain {
    pub fn raw(self) -> libc::c_int {
        match self {
            Domain::Unix => libc::AF_UNIX,
            Domain::Inet => libc::AF_INET,
            Domain::Inet6 => libc::AF_INET6,
        }
    }
}

impl From<AddressFamily> for Domain {
    fn from(family: AddressFamily) -> Self {
        match family {
            AddressFamily::Ipv4 => Domain::Inet,
            AddressFamily::Ipv6 => Domain::Inet6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketType {
    Stream,
    Datagram,
    Raw,
    Rdm,
    SeqPacket,
}

impl SocketType {
    pub fn raw(self) -> libc::c_int {
        match self {
            SocketType::Stream => libc::SOCK_STREAM,
            SocketType::Datagram => libc::SOCK_DGRAM,
            SocketType::Raw => libc::SOCK_RAW,
            SocketType::Rdm => libc::SOCK_RDM,
            SocketType::SeqPacket => libc::SOCK_SEQPACKET,
        }
    }
}

/// Protocol level, used both at creation time and for socket options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Socket,
    Tcp,
    Udp,
}

impl Level {
    pub fn raw(self) -> libc::c_int {
        match self {
            Level::Socket => libc::SOL_SOCKET,
            Level::Tcp => libc::IPPROTO_TCP,
            Level::Udp => libc::IPPROTO_UDP,
        }
    }

    /// Protocol passed to `socket(2)`; [`Level::Socket`] lets the OS pick.
    fn protocol(self) -> Option<Protocol> {
        match self {
            Level::Socket => None,
            Level::Tcp => Some(Protocol::TCP),
            Level::Udp => Some(Protocol::UDP),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    /// A single `read(2)` of at most the requested length.
    #[default]
    Binary,
    /// Reads until `\n` or `\r` (kept in the output), end of stream, or the requested length.
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutdownMode {
    Read,
    Write,
    #[default]
    Both,
}

impl From<ShutdownMode> for Shutdown {
    fn from(mode: ShutdownMode) -> Self {
        match mode {
            ShutdownMode::Read => Shutdown::Read,
            ShutdownMode::Write => Shutdown::Write,
            ShutdownMode::Both => Shutdown::Both,
        }
    }
}

/// A handle on one native socket.
///
/// Closing is terminal and idempotent; a socket still open when dropped is
/// closed then. Every primitive on a closed socket fails with `EBADF`.
#[derive(Debug)]
pub struct Socket {
    inner: Option<RawSocket>,
    domain: Domain,
    socket_type: SocketType,
    last_error: AtomicI32,
}

impl Socket {
    pub fn create(domain: Domain, socket_type: SocketType, level: Level) -> Result<Self, SocketError> {
        let inner = RawSocket::new(
            RawDomain::from(domain.raw()),
            Type::from(socket_type.raw()),
            level.protocol(),
        )?;
        debug!("created {socket_type:?} socket in {domain:?}");
        Ok(Self::wrap(inner, domain, socket_type))
    }

    fn wrap(inner: RawSocket, domain: Domain, socket_type: SocketType) -> Self {
        Self {
            inner: Some(inner),
            domain,
            socket_type,
            last_error: AtomicI32::new(0),
        }
    }

    pub fn bind(&self, endpoint: &Endpoint) -> Result<(), SocketError> {
        let inner = self.raw()?;
        trace!("bind {endpoint}");
        self.track(inner.bind(&SockAddr::from(endpoint.to_socket_addr())))
    }

    /// Binds to `address` on a port chosen by the OS.
    pub fn bind_any(&self, address: &InetAddress) -> Result<(), SocketError> {
        let inner = self.raw()?;
        trace!("bind {address} on an ephemeral port");
        self.track(inner.bind(&SockAddr::from(SocketAddr::new(address.ip(), 0))))
    }

    pub fn connect(&self, endpoint: &Endpoint) -> Result<(), SocketError> {
        let inner = self.raw()?;
        trace!("connect {endpoint}");
        self.track(inner.connect(&SockAddr::from(endpoint.to_socket_addr())))
    }

    pub fn listen(&self, backlog: i32) -> Result<(), SocketError> {
        let inner = self.raw()?;
        self.track(inner.listen(backlog))
    }

    pub fn accept(&self) -> Result<Socket, SocketError> {
        let inner = self.raw()?;
        let (accepted, peer) = self.track(inner.accept())?;
        debug!("accepted connection from {:?}", peer.as_socket());
        Ok(Self::wrap(accepted, self.domain, self.socket_type))
    }

    pub fn read(&self, length: usize, mode: ReadMode) -> Result<Vec<u8>, SocketError> {
        let mut reader: &RawSocket = self.raw()?;
        match mode {
            ReadMode::Binary => {
                let mut buffer: Vec<u8> = vec![0u8; length];
                let len: usize = self.track(reader.read(&mut buffer))?;
                buffer.truncate(len);
                Ok(buffer)
            }
            ReadMode::Normal => {
                let mut line: Vec<u8> = Vec::new();
                let mut byte = [0u8; 1];
                while line.len() < length {
                    if self.track(reader.read(&mut byte))? == 0 {
                        break;
                    }
                    line.push(byte[0]);
                    if matches!(byte[0], b'\n' | b'\r') {
                        break;
                    }
                }
                Ok(line)
            }
        }
    }

    /// Writes at most `length` bytes of `data` (all of it when `None`).
    pub fn write(&self, data: &[u8], length: Option<usize>) -> Result<usize, SocketError> {
        let mut writer: &RawSocket = self.raw()?;
        self.track(writer.write(clamp(data, length)))
    }

    pub fn send(&self, data: &[u8], length: Option<usize>, flags: i32) -> Result<usize, SocketError> {
        let inner = self.raw()?;
        self.track(inner.send_with_flags(clamp(data, length), flags))
    }

    pub fn receive(&self, length: usize, flags: i32) -> Result<Vec<u8>, SocketError> {
        let inner = self.raw()?;
        let mut buffer: Vec<MaybeUninit<u8>> = vec![MaybeUninit::uninit(); length];
        let len: usize = self.track(inner.recv_with_flags(&mut buffer, flags))?;
        Ok(filled(buffer, len))
    }

    pub fn send_to(
        &self,
        endpoint: &Endpoint,
        data: &[u8],
        length: Option<usize>,
        flags: i32,
    ) -> Result<usize, SocketError> {
        let inner = self.raw()?;
        let target = SockAddr::from(endpoint.to_socket_addr());
        self.track(inner.send_to_with_flags(clamp(data, length), &target, flags))
    }

    /// Receives one message together with the endpoint it came from.
    pub fn receive_from(&self, length: usize, flags: i32) -> Result<(Vec<u8>, Endpoint), Error> {
        let inner = self.raw()?;
        let mut buffer: Vec<MaybeUninit<u8>> = vec![MaybeUninit::uninit(); length];
        let (len, peer) = self.track(inner.recv_from_with_flags(&mut buffer, flags))?;
        let peer: Endpoint = Endpoint::try_from(self.inet(&peer)?)?;
        Ok((filled(buffer, len), peer))
    }

    /// Clears any pending error and releases the descriptor. No-op once closed.
    pub fn close(&mut self) {
        if self.inner.is_none() {
            return;
        }
        self.clear_error();
        if let Some(inner) = self.inner.take() {
            drop(inner);
            debug!("closed {:?} socket", self.socket_type);
        }
    }

    pub fn shutdown(&self, mode: ShutdownMode) -> bool {
        self.raw()
            .and_then(|inner| self.track(inner.shutdown(mode.into())))
            .is_ok()
    }

    pub fn set_blocking(&self) -> bool {
        self.raw()
            .and_then(|inner| self.track(inner.set_nonblocking(false)))
            .is_ok()
    }

    pub fn set_nonblocking(&self) -> bool {
        self.raw()
            .and_then(|inner| self.track(inner.set_nonblocking(true)))
            .is_ok()
    }

    /// Sets an integer-valued option, e.g. `(Level::Socket, flags::SO_REUSEADDR, 1)`.
    pub fn set_option(&self, level: Level, option: i32, value: i32) -> Result<(), SocketError> {
        let fd: RawFd = self.raw_fd()?;
        let value: libc::c_int = value;
        // SAFETY: `fd` is open for the lifetime of `self`, and the value pointer
        // refers to a live c_int whose size is passed alongside it.
        let rc = unsafe {
            libc::setsockopt(
                fd,
                level.raw(),
                option,
                &value as *const libc::c_int as *const libc::c_void,
                size_of::<libc::c_int>() as libc::socklen_t,
            )
        };
        if rc == -1 {
            return Err(self.record(io::Error::last_os_error().into()));
        }
        Ok(())
    }

    pub fn get_option(&self, level: Level, option: i32) -> Result<i32, SocketError> {
        let fd: RawFd = self.raw_fd()?;
        let mut value: libc::c_int = 0;
        let mut len = size_of::<libc::c_int>() as libc::socklen_t;
        // SAFETY: as in `set_option`; the kernel writes at most `len` bytes into `value`.
        let rc = unsafe {
            libc::getsockopt(
                fd,
                level.raw(),
                option,
                &mut value as *mut libc::c_int as *mut libc::c_void,
                &mut len,
            )
        };
        if rc == -1 {
            return Err(self.record(io::Error::last_os_error().into()));
        }
        Ok(value)
    }

    pub fn local_addr(&self) -> Result<SocketAddr, SocketError> {
        let inner = self.raw()?;
        let addr: SockAddr = self.track(inner.local_addr())?;
        self.inet(&addr)
    }

    pub fn local_endpoint(&self) -> Result<Endpoint, Error> {
        Ok(Endpoint::try_from(self.local_addr()?)?)
    }

    pub fn remote_endpoint(&self) -> Result<Endpoint, Error> {
        let inner = self.raw()?;
        let addr: SockAddr = self.track(inner.peer_addr())?;
        Ok(Endpoint::try_from(self.inet(&addr)?)?)
    }

    pub fn raw_fd(&self) -> Result<RawFd, SocketError> {
        self.raw().map(|inner| inner.as_raw_fd())
    }

    /// The underlying `socket2` handle, `None` once closed.
    pub fn inner(&self) -> Option<&RawSocket> {
        self.inner.as_ref()
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn socket_type(&self) -> SocketType {
        self.socket_type
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    pub fn is_at_oob_mark(&self) -> Result<bool, SocketError> {
        let fd: RawFd = self.raw_fd()?;
        // SAFETY: `fd` is an open descriptor owned by `self`.
        match unsafe { sys::sockatmark(fd) } {
            -1 => Err(self.record(io::Error::last_os_error().into())),
            mark => Ok(mark == 1),
        }
    }

    /// Code of the last failed primitive on this socket, `0` if none since the last clear.
    pub fn last_error(&self) -> i32 {
        self.last_error.load(Ordering::Relaxed)
    }

    pub fn error_message(code: i32) -> String {
        SocketError::describe(code)
    }

    /// Forgets the last error and drains any error pending in the kernel (`SO_ERROR`).
    pub fn clear_error(&self) {
        self.last_error.store(0, Ordering::Relaxed);
        if let Some(inner) = &self.inner {
            let _ = inner.take_error();
        }
    }

    fn raw(&self) -> Result<&RawSocket, SocketError> {
        self.inner
            .as_ref()
            .ok_or_else(|| self.record(SocketError::closed()))
    }

    fn inet(&self, addr: &SockAddr) -> Result<SocketAddr, SocketError> {
        addr.as_socket()
            .ok_or_else(|| self.record(SocketError::from_code(libc::EAFNOSUPPORT)))
    }

    fn track<T>(&self, result: io::Result<T>) -> Result<T, SocketError> {
        result.map_err(|e| self.record(e.into()))
    }

    fn record(&self, err: SocketError) -> SocketError {
        trace!("socket primitive failed: {err}");
        self.last_error.store(err.code, Ordering::Relaxed);
        err
    }
}

impl Drop for Socket {
    fn drop(&mut self) {
        self.close();
    }
}

fn clamp(data: &[u8], length: Option<usize>) -> &[u8] {
    match length {
        Some(len) => &data[..len.min(data.len())],
        None => data,
    }
}

fn filled(mut buffer: Vec<MaybeUninit<u8>>, len: usize) -> Vec<u8> {
    buffer.truncate(len);
    buffer
        .into_iter()
        // SAFETY: the kernel initialised the first `len` bytes of the buffer.
        .map(|byte| unsafe { byte.assume_init() })
        .collect()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝


mod sys {
    // POSIX `sockatmark(3)`; not exported by the `libc` crate.
    unsafe extern "C" {
        pub fn sockatmark(fd: libc::c_int) -> libc::c_int;
    }
}
