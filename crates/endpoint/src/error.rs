//! Error types for the endpoint library.

use crate::family::AddressFamily;
use thiserror::Error;

/// Result type alias for the endpoint library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or using an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Textual address did not parse under the requested family.
    ///
    /// `family` is `Unspecified` when neither family accepted the input.
    #[error("invalid {} address: {input:?}", .family.noun())]
    InvalidAddress {
        input: String,
        family: AddressFamily,
    },
    /// Family tag is neither IPv4 nor IPv6.
    #[error("unsupported address family: {0}")]
    UnsupportedFamily(u16),
    /// Native buffer is shorter than the layout its family tag requires.
    #[error("native address truncated: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
    /// Rendered address did not fit the fixed text buffer.
    #[error("rendered address exceeds {capacity} bytes")]
    TextOverflow { capacity: usize },
    /// `addr:port` text did not parse as a socket address.
    #[error("invalid socket address: {0:?}")]
    InvalidSocketAddr(String),
}

impl Error {
    pub(crate) fn invalid_address(input: &str, family: AddressFamily) -> Self {
        Error::InvalidAddress {
            input: input.to_owned(),
            family,
        }
    }
}
