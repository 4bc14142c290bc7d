//! # netsock common
//!
//! Value types shared by every crate in the workspace.
//!
//! * **[`network::address`]**: [`InetAddress`](network::address::InetAddress), a validated
//!   IPv4/IPv6 literal optionally tagged with the hostname it was resolved from.
//! * **[`network::endpoint`]**: [`Endpoint`](network::endpoint::Endpoint), an address paired
//!   with a port in `1..=65535`.
//! * **[`network::resolve`]**: the [`Resolve`](network::resolve::Resolve) seam used for
//!   hostname lookups, and the host resolver implementation.
//! * **[`config`]**: runtime settings shared by the library crates and the CLI.

pub mod config;
pub mod error;
pub mod log;
pub mod network;

#[doc(hidden)]
pub use tracing;
