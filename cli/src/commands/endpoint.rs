use colored::*;
use netsock_common::network::endpoint::Endpoint;
use netsock_common::network::resolve::Resolve;
use netsock_common::success;

use crate::terminal::print;

const KEY_WIDTH: usize = 8;

pub fn endpoint(text: &str, resolver: &dyn Resolve) -> anyhow::Result<()> {
    let endpoint: Endpoint = Endpoint::parse_with(text, resolver)?;
    let address = endpoint.inet_address();

    print::header("endpoint");
    print::aligned_line("address", address.address().bold(), KEY_WIDTH);
    print::aligned_line("family", address.address_family(), KEY_WIDTH);
    if !address.hostname().is_empty() {
        print::aligned_line("hostname", address.hostname(), KEY_WIDTH);
    }
    print::aligned_line("port", endpoint.port(), KEY_WIDTH);

    success!("{} is {}", text, endpoint.to_string().green());
    Ok(())
}
