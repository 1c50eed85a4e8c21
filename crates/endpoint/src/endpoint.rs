//! The dual-family endpoint value.
//!
//! An [`Endpoint`] is a fixed-size `Copy` value carrying either an IPv4 or an
//! IPv6 socket address. The family tag decides which prefix of the shared
//! 16-byte address storage is meaningful; the remaining bytes stay zero from
//! construction onwards.

use crate::config::ParseOrder;
use crate::error::{Error, Result};
use crate::family::AddressFamily;
use crate::text::AddressText;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::str::FromStr;
use tracing::debug;

/// Size of the shared address storage (the IPv6 address length).
pub const ADDRESS_LEN: usize = 16;

/// IPv4 or IPv6 address plus port in one fixed-size value.
///
/// Equality and hashing are field-wise for both families: family tag, the
/// address bytes the family declares, the port and (IPv6 only) the scope id.
/// Flow info travels with the value but is not part of its identity.
#[derive(Copy, Clone)]
pub struct Endpoint {
    pub(crate) family: AddressFamily,
    /// Port in network byte order.
    pub(crate) port_be: u16,
    pub(crate) address: [u8; ADDRESS_LEN],
    pub(crate) flowinfo: u32,
    pub(crate) scope_id: u32,
}

impl Endpoint {
    const fn zeroed() -> Self {
        Self {
            family: AddressFamily::Unspecified,
            port_be: 0,
            address: [0; ADDRESS_LEN],
            flowinfo: 0,
            scope_id: 0,
        }
    }

    /// Parses a dotted-quad IPv4 literal.
    pub fn from_ipv4(address: &str, port: u16) -> Result<Self> {
        let ip = Ipv4Addr::from_str(address).map_err(|_| {
            debug!(address, "rejected IPv4 literal");
            Error::invalid_address(address, AddressFamily::Ipv4)
        })?;
        Ok(Self::from(SocketAddrV4::new(ip, port)))
    }

    /// Parses an IPv6 literal without brackets.
    ///
    /// A `%zone` suffix sets the scope id: either a numeric index or, on
    /// Unix, an interface name. Empty or unknown zones are rejected.
    pub fn from_ipv6(address: &str, port: u16) -> Result<Self> {
        let reject = || {
            debug!(address, "rejected IPv6 literal");
            Error::invalid_address(address, AddressFamily::Ipv6)
        };
        let (literal, zone) = match address.split_once('%') {
            Some((literal, zone)) => (literal, Some(zone)),
            None => (address, None),
        };
        let ip = Ipv6Addr::from_str(literal).map_err(|_| reject())?;
        let mut endpoint = Self::from_ipv6_octets(port, ip.octets());
        if let Some(zone) = zone {
            endpoint.scope_id = zone_index(zone).ok_or_else(reject)?;
        }
        Ok(endpoint)
    }

    /// Parses a literal of either family, trying IPv6 first.
    pub fn from_string(address: &str, port: u16) -> Result<Self> {
        Self::from_string_with(address, port, ParseOrder::default())
    }

    /// Parses a literal of either family in the given order.
    pub fn from_string_with(address: &str, port: u16, order: ParseOrder) -> Result<Self> {
        for family in order.families() {
            let parsed = match family {
                AddressFamily::Ipv4 => Self::from_ipv4(address, port),
                AddressFamily::Ipv6 => Self::from_ipv6(address, port),
                AddressFamily::Unspecified => continue,
            };
            if let Ok(endpoint) = parsed {
                return Ok(endpoint);
            }
        }
        Err(Error::invalid_address(address, AddressFamily::Unspecified))
    }

    pub fn from_ipv4_octets(port: u16, b0: u8, b1: u8, b2: u8, b3: u8) -> Self {
        let mut endpoint = Self::zeroed();
        endpoint.set_family(AddressFamily::Ipv4);
        endpoint.set_port(port);
        endpoint.address[..4].copy_from_slice(&[b0, b1, b2, b3]);
        endpoint
    }

    /// Builds an IPv6 endpoint from eight host-order 16-bit groups.
    #[allow(clippy::too_many_arguments)]
    pub fn from_ipv6_groups(
        port: u16,
        s0: u16,
        s1: u16,
        s2: u16,
        s3: u16,
        s4: u16,
        s5: u16,
        s6: u16,
        s7: u16,
    ) -> Self {
        let mut octets = [0u8; ADDRESS_LEN];
        for (chunk, group) in octets
            .chunks_exact_mut(2)
            .zip([s0, s1, s2, s3, s4, s5, s6, s7])
        {
            chunk.copy_from_slice(&group.to_be_bytes());
        }
        Self::from_ipv6_octets(port, octets)
    }

    pub fn from_ipv6_octets(port: u16, octets: [u8; ADDRESS_LEN]) -> Self {
        let mut endpoint = Self::zeroed();
        endpoint.set_family(AddressFamily::Ipv6);
        endpoint.set_port(port);
        endpoint.address = octets;
        endpoint
    }

    pub fn from_ip(ip: IpAddr, port: u16) -> Self {
        Self::from(SocketAddr::new(ip, port))
    }

    pub fn is_ipv4(&self) -> bool {
        self.family == AddressFamily::Ipv4
    }

    pub fn is_ipv6(&self) -> bool {
        self.family == AddressFamily::Ipv6
    }

    pub fn family(&self) -> AddressFamily {
        self.family
    }

    /// Overwrites the family tag without touching the address bytes.
    ///
    /// The caller must re-populate the address afterwards; a tag that no
    /// longer matches the stored bytes breaks equality and rendering.
    pub fn set_family(&mut self, family: AddressFamily) {
        self.family = family;
    }

    /// Port in host byte order.
    pub fn port(&self) -> u16 {
        u16::from_be(self.port_be)
    }

    pub fn set_port(&mut self, port: u16) {
        self.port_be = port.to_be();
    }

    /// The port exactly as stored (big-endian).
    pub fn port_bytes(&self) -> [u8; 2] {
        self.port_be.to_ne_bytes()
    }

    /// Address bytes meaningful for the current family (4, 16 or none).
    pub fn octets(&self) -> &[u8] {
        &self.address[..self.family.address_len()]
    }

    /// IPv6 flow label, host order. Always zero for IPv4.
    pub fn flowinfo(&self) -> u32 {
        self.flowinfo
    }

    pub fn set_flowinfo(&mut self, flowinfo: u32) {
        self.flowinfo = flowinfo;
    }

    /// IPv6 scope (interface) id. Always zero for IPv4.
    pub fn scope_id(&self) -> u32 {
        self.scope_id
    }

    pub fn set_scope_id(&mut self, scope_id: u32) {
        self.scope_id = scope_id;
    }

    /// The address as a std `IpAddr`.
    pub fn ip(&self) -> Result<IpAddr> {
        match self.family {
            AddressFamily::Ipv4 => {
                let [a, b, c, d, ..] = self.address;
                Ok(IpAddr::V4(Ipv4Addr::new(a, b, c, d)))
            }
            AddressFamily::Ipv6 => Ok(IpAddr::V6(Ipv6Addr::from(self.address))),
            AddressFamily::Unspecified => Err(Error::UnsupportedFamily(self.family.code())),
        }
    }

    /// Canonical address text and host-order port.
    ///
    /// IPv4 renders as a dotted quad, IPv6 in RFC 5952 form. The text never
    /// exceeds `INET6_ADDRSTRLEN` bytes. The zone is not part of the text;
    /// read it from [`scope_id`](Self::scope_id).
    pub fn to_parts(&self) -> Result<(AddressText, u16)> {
        let text = AddressText::from_display(&self.ip()?)?;
        Ok((text, self.port()))
    }

    fn identity(&self) -> (AddressFamily, u16, &[u8], u32) {
        let address = match self.family {
            AddressFamily::Unspecified => &self.address[..],
            family => &self.address[..family.address_len()],
        };
        let scope_id = if self.is_ipv6() { self.scope_id } else { 0 };
        (self.family, self.port_be, address, scope_id)
    }
}

/// Resolves an IPv6 zone to an interface index.
fn zone_index(zone: &str) -> Option<u32> {
    if zone.is_empty() {
        return None;
    }
    if let Ok(index) = zone.parse::<u32>() {
        return Some(index);
    }
    interface_index(zone)
}

#[cfg(unix)]
fn interface_index(name: &str) -> Option<u32> {
    let name = std::ffi::CString::new(name).ok()?;
    // SAFETY: `name` is a valid NUL-terminated string for the whole call.
    let index = unsafe { libc::if_nametoindex(name.as_ptr()) };
    (index != 0).then_some(index)
}

#[cfg(not(unix))]
fn interface_index(_name: &str) -> Option<u32> {
    None
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl Eq for Endpoint {}

impl Hash for Endpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity().hash(state);
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Endpoint");
        s.field("family", &self.family);
        match self.ip() {
            Ok(ip) => s.field("address", &ip),
            Err(_) => s.field("address", &self.address),
        };
        s.field("port", &self.port());
        if self.is_ipv6() {
            s.field("flowinfo", &self.flowinfo)
                .field("scope_id", &self.scope_id);
        }
        s.finish()
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match SocketAddr::try_from(*self) {
            Ok(addr) => fmt::Display::fmt(&addr, f),
            Err(_) => write!(f, "<unspecified>:{}", self.port()),
        }
    }
}

impl FromStr for Endpoint {
    type Err = Error;

    /// Parses `a.b.c.d:port` or `[v6]:port` (optionally `[v6%scope]:port`).
    fn from_str(s: &str) -> Result<Self> {
        s.parse::<SocketAddr>().map(Self::from).map_err(|_| {
            debug!(input = s, "rejected socket address");
            Error::InvalidSocketAddr(s.to_owned())
        })
    }
}

impl From<SocketAddrV4> for Endpoint {
    fn from(addr: SocketAddrV4) -> Self {
        let [b0, b1, b2, b3] = addr.ip().octets();
        Self::from_ipv4_octets(addr.port(), b0, b1, b2, b3)
    }
}

impl From<SocketAddrV6> for Endpoint {
    fn from(addr: SocketAddrV6) -> Self {
        let mut endpoint = Self::from_ipv6_octets(addr.port(), addr.ip().octets());
        endpoint.flowinfo = addr.flowinfo();
        endpoint.scope_id = addr.scope_id();
        endpoint
    }
}

impl From<SocketAddr> for Endpoint {
    fn from(addr: SocketAddr) -> Self {
        match addr {
            SocketAddr::V4(v4) => v4.into(),
            SocketAddr::V6(v6) => v6.into(),
        }
    }
}

impl TryFrom<Endpoint> for SocketAddr {
    type Error = Error;

    fn try_from(endpoint: Endpoint) -> Result<Self> {
        Ok(match endpoint.ip()? {
            IpAddr::V4(ip) => SocketAddr::V4(SocketAddrV4::new(ip, endpoint.port())),
            IpAddr::V6(ip) => SocketAddr::V6(SocketAddrV6::new(
                ip,
                endpoint.port(),
                endpoint.flowinfo,
                endpoint.scope_id,
            )),
        })
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if !self.family.is_supported() {
            return Err(S::Error::custom(Error::UnsupportedFamily(self.family.code())));
        }
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
