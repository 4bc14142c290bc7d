//! Status macros on top of `tracing`.
//!
//! Events are emitted under dedicated targets so a formatter can pick a symbol
//! per kind of message without parsing the text.

pub const TARGET_INFO: &str = "netsock::info";
pub const TARGET_SUCCESS: &str = "netsock::success";
pub const TARGET_WARN: &str = "netsock::warn";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: $crate::log::TARGET_INFO, $($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::tracing::info!(target: $crate::log::TARGET_SUCCESS, $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::tracing::warn!(target: $crate::log::TARGET_WARN, $($arg)*)
    };
}
