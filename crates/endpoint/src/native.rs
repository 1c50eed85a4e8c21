//! Conversion to and from the platform's native socket-address layouts.
//!
//! This is the only place that reinterprets raw `sockaddr` memory. Everything
//! else works on the typed fields of [`Endpoint`].
//!
//! # Length checks
//!
//! `from_native` reads the family tag first (which needs the leading
//! `sa_family_t` to be present) and then requires the buffer to cover the
//! whole layout that tag names: `sockaddr_in` for IPv4, `sockaddr_in6` for
//! IPv6. Anything shorter is rejected with [`Error::Truncated`].

use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use crate::family::AddressFamily;
use std::fmt;
use std::mem::{self, size_of};
use std::ptr;
use tracing::{debug, trace};

/// Size of the native IPv4 layout.
pub const SOCKADDR_IN_LEN: usize = size_of::<libc::sockaddr_in>();
/// Size of the native IPv6 layout.
pub const SOCKADDR_IN6_LEN: usize = size_of::<libc::sockaddr_in6>();

const STORAGE_LEN: usize = size_of::<libc::sockaddr_storage>();
const FAMILY_END: usize =
    mem::offset_of!(libc::sockaddr_storage, ss_family) + size_of::<libc::sa_family_t>();

/// A native socket address ready to hand to `connect`, `bind` or `sendto`.
#[derive(Copy, Clone)]
pub struct NativeAddr {
    storage: libc::sockaddr_storage,
    len: libc::socklen_t,
}

impl NativeAddr {
    pub fn as_ptr(&self) -> *const libc::sockaddr {
        (&self.storage as *const libc::sockaddr_storage).cast()
    }

    /// Length of the meaningful prefix of the storage.
    pub fn socklen(&self) -> libc::socklen_t {
        self.len
    }

    pub fn family(&self) -> u16 {
        self.storage.ss_family as u16
    }

    /// The meaningful prefix as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `storage` was zero-initialised, so every byte is
        // initialised, and `len` never exceeds its size.
        unsafe {
            std::slice::from_raw_parts(
                (&self.storage as *const libc::sockaddr_storage).cast::<u8>(),
                self.len as usize,
            )
        }
    }
}

impl fmt::Debug for NativeAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeAddr")
            .field("family", &self.family())
            .field("len", &self.len)
            .finish()
    }
}

fn zeroed_storage() -> libc::sockaddr_storage {
    // SAFETY: sockaddr_storage is plain old data; all-zero is a valid value.
    unsafe { mem::zeroed() }
}

fn storage_as<T>(storage: &libc::sockaddr_storage) -> *const T {
    (storage as *const libc::sockaddr_storage).cast()
}

fn storage_as_mut<T>(storage: &mut libc::sockaddr_storage) -> *mut T {
    (storage as *mut libc::sockaddr_storage).cast()
}

fn require(needed: usize, actual: usize) -> Result<()> {
    if actual < needed {
        debug!(needed, actual, "native address truncated");
        return Err(Error::Truncated { needed, actual });
    }
    Ok(())
}

impl Endpoint {
    /// Builds an endpoint from a native socket-address buffer, such as the
    /// one filled in by `accept` or `getpeername`.
    pub fn from_native(raw: &[u8]) -> Result<Self> {
        require(FAMILY_END, raw.len())?;

        let mut storage = zeroed_storage();
        let copied = raw.len().min(STORAGE_LEN);
        // SAFETY: `copied` is bounded by both the source slice and the
        // destination storage.
        unsafe {
            ptr::copy_nonoverlapping(
                raw.as_ptr(),
                (&mut storage as *mut libc::sockaddr_storage).cast::<u8>(),
                copied,
            );
        }

        let code = storage.ss_family as u16;
        match AddressFamily::from_code(code) {
            Some(AddressFamily::Ipv4) => {
                require(SOCKADDR_IN_LEN, raw.len())?;
                // SAFETY: sockaddr_storage is large and aligned enough for
                // any sockaddr_* and the family tag says this one is IPv4.
                let sin = unsafe { &*storage_as::<libc::sockaddr_in>(&storage) };
                let [b0, b1, b2, b3] = sin.sin_addr.s_addr.to_ne_bytes();
                trace!("converted native IPv4 address");
                Ok(Self::from_ipv4_octets(u16::from_be(sin.sin_port), b0, b1, b2, b3))
            }
            Some(AddressFamily::Ipv6) => {
                require(SOCKADDR_IN6_LEN, raw.len())?;
                // SAFETY: as above, for sockaddr_in6.
                let sin6 = unsafe { &*storage_as::<libc::sockaddr_in6>(&storage) };
                let mut endpoint =
                    Self::from_ipv6_octets(u16::from_be(sin6.sin6_port), sin6.sin6_addr.s6_addr);
                endpoint.flowinfo = u32::from_be(sin6.sin6_flowinfo);
                endpoint.scope_id = sin6.sin6_scope_id;
                trace!("converted native IPv6 address");
                Ok(endpoint)
            }
            _ => {
                debug!(code, "unsupported native address family");
                Err(Error::UnsupportedFamily(code))
            }
        }
    }

    /// Writes this endpoint into a native socket-address layout.
    pub fn to_native(&self) -> Result<NativeAddr> {
        let mut storage = zeroed_storage();
        let len = match self.family {
            AddressFamily::Ipv4 => {
                // SAFETY: storage is large and aligned enough for sockaddr_in.
                let sin = unsafe { &mut *storage_as_mut::<libc::sockaddr_in>(&mut storage) };
                sin.sin_family = libc::AF_INET as libc::sa_family_t;
                sin.sin_port = self.port_be;
                let [a, b, c, d, ..] = self.address;
                sin.sin_addr = libc::in_addr {
                    s_addr: u32::from_ne_bytes([a, b, c, d]),
                };
                #[cfg(any(
                    target_os = "macos",
                    target_os = "ios",
                    target_os = "freebsd",
                    target_os = "dragonfly",
                    target_os = "openbsd",
                    target_os = "netbsd"
                ))]
                {
                    sin.sin_len = SOCKADDR_IN_LEN as u8;
                }
                SOCKADDR_IN_LEN
            }
            AddressFamily::Ipv6 => {
                // SAFETY: storage is large and aligned enough for sockaddr_in6.
                let sin6 = unsafe { &mut *storage_as_mut::<libc::sockaddr_in6>(&mut storage) };
                sin6.sin6_family = libc::AF_INET6 as libc::sa_family_t;
                sin6.sin6_port = self.port_be;
                sin6.sin6_flowinfo = self.flowinfo.to_be();
                sin6.sin6_addr.s6_addr = self.address;
                sin6.sin6_scope_id = self.scope_id;
                #[cfg(any(
                    target_os = "macos",
                    target_os = "ios",
                    target_os = "freebsd",
                    target_os = "dragonfly",
                    target_os = "openbsd",
                    target_os = "netbsd"
                ))]
                {
                    sin6.sin6_len = SOCKADDR_IN6_LEN as u8;
                }
                SOCKADDR_IN6_LEN
            }
            AddressFamily::Unspecified => {
                return Err(Error::UnsupportedFamily(self.family.code()));
            }
        };
        trace!(len, "built native address");
        Ok(NativeAddr {
            storage,
            len: len as libc::socklen_t,
        })
    }
}
