//! Parsing policy for family-agnostic construction.

use crate::family::AddressFamily;
use serde::{Deserialize, Serialize};

/// Order in which [`Endpoint::from_string_with`](crate::Endpoint::from_string_with)
/// tries the two families.
///
/// A literal is valid in at most one family, so the order only changes which
/// parse is attempted first. `Ipv6First` is the default.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseOrder {
    #[default]
    Ipv6First,
    Ipv4First,
}

impl ParseOrder {
    /// Families in the order they should be attempted. Never `Unspecified`.
    pub const fn families(self) -> [AddressFamily; 2] {
        match self {
            ParseOrder::Ipv6First => [AddressFamily::Ipv6, AddressFamily::Ipv4],
            ParseOrder::Ipv4First => [AddressFamily::Ipv4, AddressFamily::Ipv6],
        }
    }
}
