use colored::*;
use tracing::info;

pub const TOTAL_WIDTH: usize = 64;
pub const TARGET: &str = "netsock::print";

pub fn print(msg: &str) {
    info!(target: TARGET, "{msg}");
}

pub fn header(msg: &str) {
    print(&header_line(msg));
}

/// A full-width rule with `msg` centred in it.
fn header_line(msg: &str) -> String {
    let title: String = format!("⟦ {} ⟧", msg.to_uppercase());
    let padding: usize = TOTAL_WIDTH.saturating_sub(title.chars().count());
    let rule = |width: usize| "─".repeat(width).bright_black();

    format!("{}{}{}", rule(padding / 2), title.bright_green(), rule(padding - padding / 2))
}

/// `key.....: value`, keys padded to `width`.
pub fn aligned_line(key: &str, value: impl std::fmt::Display, width: usize) {
    let dots: String = ".".repeat((width + 1).saturating_sub(key.len()));
    let colon: ColoredString = format!("{dots}:").bright_black();
    let prefix: ColoredString = ">".bright_black();
    print(&format!("{} {}{} {}", prefix, key.cyan(), colon, value));
}

pub fn no_results(what: &str) {
    print(&format!("{} {}", ">".bright_black(), format!("no {what} found").red()));
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
