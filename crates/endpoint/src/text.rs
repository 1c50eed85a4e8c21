//! Fixed-capacity storage for rendered addresses.

use crate::error::{Error, Result};
use std::fmt::{self, Write as _};
use std::ops::Deref;

/// Longest IPv6 literal plus terminator, as in `<netinet/in.h>`.
pub const INET6_ADDRSTRLEN: usize = 46;

/// Address text held inline, without heap allocation.
///
/// Writes that would overflow the buffer fail with `fmt::Error` and leave the
/// existing contents untouched.
#[derive(Copy, Clone)]
pub struct AddressText {
    buf: [u8; INET6_ADDRSTRLEN],
    len: usize,
}

impl AddressText {
    pub const fn new() -> Self {
        Self {
            buf: [0; INET6_ADDRSTRLEN],
            len: 0,
        }
    }

    /// Renders `value` into a fresh buffer.
    ///
    /// Fails with [`Error::TextOverflow`] when the text does not fit.
    pub fn from_display<T: fmt::Display + ?Sized>(value: &T) -> Result<Self> {
        let mut text = Self::new();
        let capacity = text.capacity();
        write!(text, "{}", value).map_err(|_| Error::TextOverflow { capacity })?;
        Ok(text)
    }

    pub fn as_str(&self) -> &str {
        // Only whole `&str` pieces are ever copied in.
        std::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    pub const fn capacity(&self) -> usize {
        INET6_ADDRSTRLEN
    }
}

impl Default for AddressText {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Write for AddressText {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end > INET6_ADDRSTRLEN {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

impl Deref for AddressText {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for AddressText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq for AddressText {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for AddressText {}

impl PartialEq<str> for AddressText {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for AddressText {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for AddressText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for AddressText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}
