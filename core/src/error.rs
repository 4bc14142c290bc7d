use std::io;

use netsock_common::error::AddressError;
use thiserror::Error;

/// A failed socket primitive: the OS error code and its description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct SocketError {
    pub code: i32,
    pub message: String,
}

impl SocketError {
    pub fn from_code(code: i32) -> Self {
        Self {
            code,
            message: Self::describe(code),
        }
    }

    /// `strerror`-style text for an OS error code.
    pub fn describe(code: i32) -> String {
        let text: String = io::Error::from_raw_os_error(code).to_string();
        let suffix: String = format!(" (os error {code})");
        match text.strip_suffix(&suffix) {
            Some(message) => message.to_string(),
            None => text,
        }
    }

    pub(crate) fn closed() -> Self {
        Self::from_code(libc::EBADF)
    }
}

impl From<io::Error> for SocketError {
    fn from(err: io::Error) -> Self {
        match err.raw_os_error() {
            Some(code) => Self::from_code(code),
            None => Self {
                code: 0,
                message: err.to_string(),
            },
        }
    }
}

/// Failures of operations that also build an [`Endpoint`](netsock_common::network::endpoint::Endpoint).
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Socket(#[from] SocketError),
    #[error(transparent)]
    Address(#[from] AddressError),
}
