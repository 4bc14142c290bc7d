//! Raw constants for message flags and socket options, re-exported from `libc`
//! so callers do not need the dependency themselves.

/// Message flags for `send`/`receive` and their `*_to`/`*_from` variants.
pub const MSG_OOB: i32 = libc::MSG_OOB;
pub const MSG_PEEK: i32 = libc::MSG_PEEK;
pub const MSG_DONTROUTE: i32 = libc::MSG_DONTROUTE;
pub const MSG_WAITALL: i32 = libc::MSG_WAITALL;
pub const MSG_DONTWAIT: i32 = libc::MSG_DONTWAIT;
pub const MSG_EOR: i32 = libc::MSG_EOR;

// Level::Socket
pub const SO_DEBUG: i32 = libc::SO_DEBUG;
pub const SO_REUSEADDR: i32 = libc::SO_REUSEADDR;
pub const SO_REUSEPORT: i32 = libc::SO_REUSEPORT;
pub const SO_KEEPALIVE: i32 = libc::SO_KEEPALIVE;
pub const SO_DONTROUTE: i32 = libc::SO_DONTROUTE;
pub const SO_BROADCAST: i32 = libc::SO_BROADCAST;
pub const SO_OOBINLINE: i32 = libc::SO_OOBINLINE;
pub const SO_SNDBUF: i32 = libc::SO_SNDBUF;
pub const SO_RCVBUF: i32 = libc::SO_RCVBUF;
pub const SO_SNDLOWAT: i32 = libc::SO_SNDLOWAT;
pub const SO_RCVLOWAT: i32 = libc::SO_RCVLOWAT;
pub const SO_TYPE: i32 = libc::SO_TYPE;
pub const SO_ERROR: i32 = libc::SO_ERROR;

// Level::Tcp
pub const TCP_NODELAY: i32 = libc::TCP_NODELAY;
