//! Address family discriminator.
//!
//! The family is the one field every endpoint layout shares, so it can always
//! be read no matter which address interpretation is active.

use std::fmt;

#[cfg(unix)]
const AF_UNSPEC: u16 = libc::AF_UNSPEC as u16;
#[cfg(unix)]
const AF_INET: u16 = libc::AF_INET as u16;
#[cfg(unix)]
const AF_INET6: u16 = libc::AF_INET6 as u16;

// Winsock values.
#[cfg(not(unix))]
const AF_UNSPEC: u16 = 0;
#[cfg(not(unix))]
const AF_INET: u16 = 2;
#[cfg(not(unix))]
const AF_INET6: u16 = 23;

/// Kind of address held by an [`Endpoint`](crate::Endpoint).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum AddressFamily {
    /// No address has been stored yet.
    #[default]
    Unspecified,
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Platform `AF_*` code for this family.
    pub const fn code(self) -> u16 {
        match self {
            AddressFamily::Unspecified => AF_UNSPEC,
            AddressFamily::Ipv4 => AF_INET,
            AddressFamily::Ipv6 => AF_INET6,
        }
    }

    /// Maps a platform `AF_*` code back to a family.
    ///
    /// Returns `None` for codes outside IPv4/IPv6/unspecified (e.g. `AF_UNIX`).
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            AF_UNSPEC => Some(AddressFamily::Unspecified),
            AF_INET => Some(AddressFamily::Ipv4),
            AF_INET6 => Some(AddressFamily::Ipv6),
            _ => None,
        }
    }

    /// True for the two families an endpoint can actually carry.
    pub const fn is_supported(self) -> bool {
        !matches!(self, AddressFamily::Unspecified)
    }

    /// Number of meaningful address bytes for this family.
    pub const fn address_len(self) -> usize {
        match self {
            AddressFamily::Unspecified => 0,
            AddressFamily::Ipv4 => 4,
            AddressFamily::Ipv6 => 16,
        }
    }

    pub(crate) const fn noun(self) -> &'static str {
        match self {
            AddressFamily::Unspecified => "IP",
            AddressFamily::Ipv4 => "IPv4",
            AddressFamily::Ipv6 => "IPv6",
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Unspecified => f.write_str("unspecified"),
            other => f.write_str(other.noun()),
        }
    }
}
