pub mod datagram;
pub mod endpoint;
pub mod resolve;
pub mod stream;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use netsock_common::config::{Config, ResolverKind};
use netsock_common::network::resolve::{Resolve, SystemResolver};
use netsock_protocols::DnsResolver;
use tracing::debug;

#[derive(Parser)]
#[command(name = "netsock")]
#[command(about = "Resolve hosts, parse endpoints and exercise sockets.")]
pub struct CommandLine {
    /// Resolver used for hostnames
    #[arg(long, value_enum, default_value_t = ResolverArg::System, global = true)]
    pub resolver: ResolverArg,
    /// Nameserver for `--resolver dns` (defaults to /etc/resolv.conf)
    #[arg(long, value_name = "ADDR", global = true)]
    pub nameserver: Option<SocketAddr>,
    /// Lookup timeout in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 5000, global = true)]
    pub timeout: u64,
    /// Increase log detail (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ResolverArg {
    System,
    Dns,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every IPv4 and IPv6 address of a host
    #[command(alias = "r")]
    Resolve { host: String },
    /// Parse HOST:PORT or [HOST]:PORT
    #[command(alias = "e")]
    Endpoint { text: String },
    /// Open a TCP connection, optionally send a message and print the reply
    #[command(alias = "c")]
    Connect {
        endpoint: String,
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Accept one TCP connection and echo back what it sends
    #[command(alias = "l")]
    Listen { endpoint: String },
    /// Send a single UDP datagram
    Send { endpoint: String, text: String },
    /// Wait for a single UDP datagram
    Receive { endpoint: String },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            resolver: match self.resolver {
                ResolverArg::System => ResolverKind::System,
                ResolverArg::Dns => ResolverKind::Dns,
            },
            nameserver: self.nameserver,
            timeout: Duration::from_millis(self.timeout),
            verbosity: self.verbose,
        }
    }
}

pub fn build_resolver(cfg: &Config) -> Arc<dyn Resolve> {
    match cfg.resolver {
        ResolverKind::System => Arc::new(SystemResolver),
        ResolverKind::Dns => {
            let resolver: DnsResolver = DnsResolver::from_config(cfg);
            debug!("querying {} directly", resolver.nameserver());
            Arc::new(resolver)
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
