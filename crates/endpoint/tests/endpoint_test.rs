//! Tests for the endpoint value type.
//!
//! # Test Strategy
//!
//! 1. **Construction**: string, octet/group and std conversions
//! 2. **Rendering**: canonical text and port, `Display`/`FromStr`
//! 3. **Equality & hashing**: coherence, cross-family inequality
//! 4. **Native layout**: round trips and rejected buffers (Unix)
//! 5. **Sharing**: endpoints as keys in a concurrent map

use dashmap::DashMap;
use endpoint::{AddressFamily, Endpoint, Error, ParseOrder};
use proptest::prelude::*;
use std::collections::HashMap;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::thread;

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_ipv4_family_discrimination() {
    let ep = Endpoint::from_ipv4("10.0.0.1", 80).unwrap();
    assert!(ep.is_ipv4());
    assert!(!ep.is_ipv6());
    assert_eq!(ep.family(), AddressFamily::Ipv4);
}

#[test]
fn test_ipv6_family_discrimination() {
    let ep = Endpoint::from_ipv6("2001:db8::1", 443).unwrap();
    assert!(ep.is_ipv6());
    assert!(!ep.is_ipv4());
    assert_eq!(ep.family(), AddressFamily::Ipv6);
}

#[test]
fn test_family_specific_parsers_reject_other_family() {
    assert!(matches!(
        Endpoint::from_ipv4("::1", 80),
        Err(Error::InvalidAddress {
            family: AddressFamily::Ipv4,
            ..
        })
    ));
    assert!(matches!(
        Endpoint::from_ipv6("127.0.0.1", 80),
        Err(Error::InvalidAddress {
            family: AddressFamily::Ipv6,
            ..
        })
    ));
}

#[test]
fn test_ipv6_zone_sets_scope_id() {
    let ep = Endpoint::from_ipv6("fe80::1%2", 22).unwrap();
    assert_eq!(ep.scope_id(), 2);
    assert_eq!(Ok(ep), "[fe80::1%2]:22".parse::<Endpoint>());
    assert_eq!(Endpoint::from_string("fe80::1%2", 22), Ok(ep));
    assert_ne!(ep, Endpoint::from_ipv6("fe80::1", 22).unwrap());
}

#[test]
fn test_ipv6_bad_zone_rejected() {
    for input in ["fe80::1%", "fe80::1%no-such-interface0", "fe80::1%2%3"] {
        assert!(
            matches!(
                Endpoint::from_ipv6(input, 22),
                Err(Error::InvalidAddress {
                    family: AddressFamily::Ipv6,
                    ..
                })
            ),
            "{} should be rejected",
            input
        );
    }
}

#[test]
fn test_from_string_falls_back_to_ipv4() {
    let ep = Endpoint::from_string("172.16.0.9", 53).unwrap();
    assert!(ep.is_ipv4());
    assert_eq!(ep.port(), 53);

    let ep = Endpoint::from_string("fe80::2", 53).unwrap();
    assert!(ep.is_ipv6());
}

#[test]
fn test_from_string_invalid() {
    let err = Endpoint::from_string("not-an-address", 80).unwrap_err();
    assert!(matches!(err, Error::InvalidAddress { .. }));
    assert!(Endpoint::from_string_with("", 80, ParseOrder::Ipv4First).is_err());
}

#[test]
fn test_octets_match_string() {
    let a = Endpoint::from_ipv4_octets(8080, 10, 0, 0, 1);
    let b = Endpoint::from_ipv4("10.0.0.1", 8080).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_groups_match_string() {
    let a = Endpoint::from_ipv6_groups(443, 0x2001, 0x0db8, 0, 0, 0, 0, 0, 0x1);
    let b = Endpoint::from_ipv6("2001:db8::1", 443).unwrap();
    assert_eq!(a, b);
    assert_eq!(&a.octets()[..4], &[0x20, 0x01, 0x0d, 0xb8]);
}

#[test]
fn test_std_socket_addr_round_trip() {
    let addr: SocketAddr = "[fe80::1%4]:5353".parse().unwrap();
    let ep = Endpoint::from(addr);
    assert_eq!(ep.scope_id(), 4);
    assert_eq!(SocketAddr::try_from(ep).unwrap(), addr);

    let addr: SocketAddr = "1.2.3.4:5".parse().unwrap();
    assert_eq!(SocketAddr::try_from(Endpoint::from(addr)).unwrap(), addr);
}

#[test]
fn test_unspecified_does_not_convert() {
    assert_eq!(
        SocketAddr::try_from(Endpoint::default()),
        Err(Error::UnsupportedFamily(AddressFamily::Unspecified.code()))
    );
}

// ============================================================================
// Rendering Tests
// ============================================================================

#[test]
fn test_ipv4_to_parts() {
    let ep = Endpoint::from_ipv4("192.168.1.10", 8080).unwrap();
    let (text, port) = ep.to_parts().unwrap();
    assert_eq!(text, "192.168.1.10");
    assert_eq!(port, 8080);
}

#[test]
fn test_ipv6_groups_render_canonically() {
    let ep = Endpoint::from_ipv6_groups(443, 0x2001, 0x0db8, 0, 0, 0, 0, 0, 0x1);
    let (text, port) = ep.to_parts().unwrap();
    assert_eq!(text, "2001:db8::1");
    assert_eq!(port, 443);
}

#[test]
fn test_ipv6_rendering_is_canonical() {
    let ep = Endpoint::from_ipv6("2001:0DB8:0000:0000:0000:0000:0000:0001", 1).unwrap();
    assert_eq!(ep.to_parts().unwrap().0, "2001:db8::1");
}

#[test]
fn test_display_and_from_str_agree() {
    for text in ["10.0.0.1:80", "[2001:db8::1]:443", "[fe80::1%2]:22"] {
        let ep: Endpoint = text.parse().unwrap();
        assert_eq!(ep.to_string(), text);
    }
}

#[test]
fn test_from_str_rejects_bare_address() {
    assert_eq!(
        "10.0.0.1".parse::<Endpoint>(),
        Err(Error::InvalidSocketAddr("10.0.0.1".into()))
    );
}

#[test]
fn test_serde_as_string() {
    let ep = Endpoint::from_ipv6("2001:db8::1", 443).unwrap();
    let json = serde_json::to_string(&ep).unwrap();
    assert_eq!(json, "\"[2001:db8::1]:443\"");
    let back: Endpoint = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ep);

    assert!(serde_json::to_string(&Endpoint::default()).is_err());
    assert!(serde_json::from_str::<Endpoint>("\"nope\"").is_err());
}

// ============================================================================
// Equality & Hashing Tests
// ============================================================================

#[test]
fn test_cross_family_never_equal() {
    let v4 = Endpoint::from_ipv4("10.0.0.1", 80).unwrap();
    let mapped = Endpoint::from_ipv6("::ffff:10.0.0.1", 80).unwrap();
    assert_ne!(v4, mapped);

    let compatible = Ipv4Addr::new(10, 0, 0, 1).to_ipv6_compatible();
    let compat = Endpoint::from_ipv6_octets(80, compatible.octets());
    assert_ne!(v4, compat);
}

#[test]
fn test_port_distinguishes() {
    let a = Endpoint::from_ipv4("10.0.0.1", 80).unwrap();
    let b = Endpoint::from_ipv4("10.0.0.1", 81).unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_endpoints_as_map_keys() {
    let mut peers = HashMap::new();
    peers.insert(Endpoint::from_ipv4("10.0.0.1", 80).unwrap(), "a");
    peers.insert(Endpoint::from_ipv6("::1", 80).unwrap(), "b");
    assert_eq!(peers.get(&Endpoint::from_ipv4_octets(80, 10, 0, 0, 1)), Some(&"a"));
    assert_eq!(peers.get(&Endpoint::from_ipv6_groups(80, 0, 0, 0, 0, 0, 0, 0, 1)), Some(&"b"));
}

// ============================================================================
// Native Layout Tests
// ============================================================================

#[cfg(unix)]
#[test]
fn test_native_round_trip() {
    for ep in [
        Endpoint::from_ipv4("192.168.1.10", 8080).unwrap(),
        Endpoint::from_ipv6("2001:db8::1", 443).unwrap(),
    ] {
        let native = ep.to_native().unwrap();
        assert_eq!(Endpoint::from_native(native.as_bytes()).unwrap(), ep);
    }
}

#[cfg(unix)]
#[test]
fn test_native_rejects_unix_family() {
    let mut storage: libc::sockaddr_storage = unsafe { std::mem::zeroed() };
    storage.ss_family = libc::AF_UNIX as libc::sa_family_t;
    let raw = unsafe {
        std::slice::from_raw_parts(
            (&storage as *const libc::sockaddr_storage).cast::<u8>(),
            std::mem::size_of::<libc::sockaddr_storage>(),
        )
    };
    assert_eq!(
        Endpoint::from_native(raw),
        Err(Error::UnsupportedFamily(libc::AF_UNIX as u16))
    );
}

#[cfg(unix)]
#[test]
fn test_native_rejects_short_buffer() {
    let native = Endpoint::from_ipv6("::1", 80).unwrap().to_native().unwrap();
    let bytes = native.as_bytes();
    assert!(matches!(
        Endpoint::from_native(&bytes[..bytes.len() - 1]),
        Err(Error::Truncated { .. })
    ));
}

// ============================================================================
// Sharing Tests
// ============================================================================

#[test]
fn test_concurrent_map_keys() {
    let table: Arc<DashMap<Endpoint, u16>> = Arc::new(DashMap::new());
    let handles: Vec<_> = (0..4u8)
        .map(|worker| {
            let table = Arc::clone(&table);
            thread::spawn(move || {
                for port in 0..64u16 {
                    let ep = Endpoint::from_ipv4_octets(port, 10, 0, 0, worker);
                    table.insert(ep, port);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(table.len(), 4 * 64);
    let lookup = Endpoint::from_ipv4("10.0.0.3", 17).unwrap();
    assert_eq!(table.get(&lookup).map(|v| *v), Some(17));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_port_round_trip(port in any::<u16>()) {
        let mut ep = Endpoint::from_ipv4_octets(0, 127, 0, 0, 1);
        ep.set_port(port);
        prop_assert_eq!(ep.port(), port);
        prop_assert_eq!(ep.port_bytes(), port.to_be_bytes());
    }

    #[test]
    fn prop_ipv4_text_round_trip(octets in any::<[u8; 4]>(), port in any::<u16>()) {
        let text = Ipv4Addr::from(octets).to_string();
        let ep = Endpoint::from_ipv4(&text, port).unwrap();
        let (rendered, rendered_port) = ep.to_parts().unwrap();
        prop_assert_eq!(rendered.as_str(), text.as_str());
        prop_assert_eq!(rendered_port, port);
    }

    #[test]
    fn prop_ipv6_text_round_trip(octets in any::<[u8; 16]>(), port in any::<u16>()) {
        let text = Ipv6Addr::from(octets).to_string();
        let ep = Endpoint::from_ipv6(&text, port).unwrap();
        let (rendered, rendered_port) = ep.to_parts().unwrap();
        prop_assert_eq!(rendered.as_str(), text.as_str());
        prop_assert_eq!(rendered_port, port);
    }

    #[test]
    fn prop_equal_implies_equal_hash(
        a in any::<[u8; 4]>(),
        b in any::<[u8; 4]>(),
        v6 in any::<[u8; 16]>(),
        port in 0u16..4,
    ) {
        let candidates = [
            Endpoint::from_ipv4_octets(port, a[0], a[1], a[2], a[3]),
            Endpoint::from_ipv4_octets(port, b[0], b[1], b[2], b[3]),
            Endpoint::from_ipv6_octets(port, v6),
            Endpoint::from_ipv6_octets(port, v6),
        ];
        for x in &candidates {
            for y in &candidates {
                if x == y {
                    prop_assert_eq!(x.hash_code().unwrap(), y.hash_code().unwrap());
                }
            }
        }
    }

    #[test]
    fn prop_v4_and_v6_never_equal(octets in any::<[u8; 4]>(), port in any::<u16>()) {
        let v4 = Endpoint::from_ipv4_octets(port, octets[0], octets[1], octets[2], octets[3]);
        let mapped = Endpoint::from_ip(Ipv4Addr::from(octets).to_ipv6_mapped().into(), port);
        prop_assert_ne!(v4, mapped);
    }
}
