mod commands;
mod terminal;

use std::sync::Arc;

use commands::{CommandLine, Commands, datagram, endpoint, resolve, stream};
use netsock_common::config::Config;
use netsock_common::network::resolve::Resolve;
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    let cfg: Config = commands.config();
    logging::init_logging(cfg.verbosity);

    let resolver: Arc<dyn Resolve> = commands::build_resolver(&cfg);

    match commands.command {
        Commands::Resolve { host } => resolve::resolve(&host, resolver, &cfg).await,
        Commands::Endpoint { text } => endpoint::endpoint(&text, resolver.as_ref()),
        Commands::Connect { endpoint, message } => {
            stream::connect(&endpoint, message.as_deref(), resolver.as_ref())
        }
        Commands::Listen { endpoint } => stream::listen(&endpoint, resolver.as_ref()),
        Commands::Send { endpoint, text } => datagram::send(&endpoint, &text, resolver.as_ref()),
        Commands::Receive { endpoint } => datagram::receive(&endpoint, resolver.as_ref()),
    }
}
