//! Stable 64-bit hashing of endpoints.
//!
//! IPv4 endpoints pack their two meaningful fields directly into the result:
//! the big-endian address in the low 32 bits, the host-order port above it.
//! IPv6 endpoints hash their fixed binary image with xxh3.
//!
//! Values are stable within a process but are not a persisted format.

use crate::endpoint::{Endpoint, ADDRESS_LEN};
use crate::error::{Error, Result};
use crate::family::AddressFamily;
use xxhash_rust::xxh3::xxh3_64;

/// Length of the binary image hashed for IPv6 endpoints.
pub const IMAGE_LEN: usize = 2 + 2 + ADDRESS_LEN + 4;

impl Endpoint {
    /// Hash suitable for keying endpoint tables.
    ///
    /// Equal endpoints always produce equal hashes.
    pub fn hash_code(&self) -> Result<u64> {
        match self.family {
            AddressFamily::Ipv4 => {
                let [a, b, c, d, ..] = self.address;
                let address = u32::from_be_bytes([a, b, c, d]);
                Ok((u64::from(self.port()) << 32) | u64::from(address))
            }
            AddressFamily::Ipv6 => Ok(xxh3_64(&self.image())),
            AddressFamily::Unspecified => Err(Error::UnsupportedFamily(self.family.code())),
        }
    }

    /// Fixed binary image: family code, port, address, scope id.
    ///
    /// Covers exactly the fields that take part in equality.
    pub fn image(&self) -> [u8; IMAGE_LEN] {
        let mut image = [0u8; IMAGE_LEN];
        image[0..2].copy_from_slice(&self.family.code().to_be_bytes());
        image[2..4].copy_from_slice(&self.port_bytes());
        image[4..4 + ADDRESS_LEN].copy_from_slice(&self.address);
        if self.is_ipv6() {
            image[4 + ADDRESS_LEN..].copy_from_slice(&self.scope_id.to_be_bytes());
        }
        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ipv4_hash_layout() {
        let ep = Endpoint::from_ipv4("192.168.1.10", 8080).unwrap();
        let hash = ep.hash_code().unwrap();
        assert_eq!(hash & 0xffff_ffff, 0xC0A8_010A);
        assert_eq!(hash >> 32, 8080);
    }

    #[test]
    fn test_ipv6_hash_ignores_flowinfo() {
        let a = Endpoint::from_ipv6("2001:db8::1", 443).unwrap();
        let mut b = a;
        b.set_flowinfo(0xabcd);
        assert_eq!(a.hash_code().unwrap(), b.hash_code().unwrap());
    }

    #[test]
    fn test_ipv6_hash_depends_on_port() {
        let a = Endpoint::from_ipv6("2001:db8::1", 443).unwrap();
        let b = Endpoint::from_ipv6("2001:db8::1", 444).unwrap();
        assert_ne!(a.hash_code().unwrap(), b.hash_code().unwrap());
    }

    #[test]
    fn test_unspecified_hash_fails() {
        let ep = Endpoint::default();
        assert_eq!(
            ep.hash_code(),
            Err(Error::UnsupportedFamily(AddressFamily::Unspecified.code()))
        );
    }
}
