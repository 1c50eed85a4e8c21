//! Dual-family network endpoints.
//!
//! This crate provides the addressing primitive for the networking stack:
//! - [`Endpoint`]: an IPv4 or IPv6 address plus port in one fixed-size value
//! - [`AddressFamily`]: the family discriminator and its platform codes
//! - Conversion to and from native socket-address layouts (Unix)
//! - Canonical text rendering, equality and a stable 64-bit hash

pub mod config;
pub mod endpoint;
pub mod error;
pub mod family;
pub mod hash;
#[cfg(unix)]
pub mod native;
pub mod text;

pub use config::ParseOrder;
pub use endpoint::Endpoint;
pub use error::{Error, Result};
pub use family::AddressFamily;
#[cfg(unix)]
pub use native::NativeAddr;
pub use text::{AddressText, INET6_ADDRSTRLEN};
