//! IPv4/IPv6 prefix (CIDR block) with canonical base address.
//!
//! Provides [`Prefix`], always stored with host bits cleared, along with the
//! bit-level helpers the aggregator builds on.

use crate::error::PrefixError;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Maximum prefix length for IPv4 (32 bits).
pub const MAX_LENGTH_V4: u8 = 32;
/// Maximum prefix length for IPv6 (128 bits).
pub const MAX_LENGTH_V6: u8 = 128;

/// IP protocol version of a [`Prefix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// Address width in bits.
    pub fn max_length(self) -> u8 {
        match self {
            IpVersion::V4 => MAX_LENGTH_V4,
            IpVersion::V6 => MAX_LENGTH_V6,
        }
    }

    pub fn of(addr: &IpAddr) -> IpVersion {
        match addr {
            IpAddr::V4(_) => IpVersion::V4,
            IpAddr::V6(_) => IpVersion::V6,
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IpVersion::V4 => write!(f, "IPv4"),
            IpVersion::V6 => write!(f, "IPv6"),
        }
    }
}

/// Network mask with the top `len` bits set, in an address space `max_len` bits wide.
///
/// # Examples
/// ```
/// use route_subnets::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24, 32), 0xFFFF_FF00);
/// assert_eq!(get_cidr_mask(0, 128), 0);
/// ```
pub fn get_cidr_mask(len: u8, max_len: u8) -> u128 {
    debug_assert!(len <= max_len && max_len <= MAX_LENGTH_V6);
    let all_bits = u128::MAX >> (MAX_LENGTH_V6 - max_len);
    let host_len = u32::from(max_len - len);
    if host_len >= 128 {
        0
    } else {
        (all_bits >> host_len) << host_len
    }
}

/// Address as an unsigned integer (IPv4 occupies the low 32 bits).
pub fn addr_bits(addr: IpAddr) -> u128 {
    match addr {
        IpAddr::V4(a) => u128::from(u32::from(a)),
        IpAddr::V6(a) => u128::from(a),
    }
}

fn addr_from_bits(version: IpVersion, bits: u128) -> IpAddr {
    match version {
        IpVersion::V4 => IpAddr::V4(Ipv4Addr::from(bits as u32)),
        IpVersion::V6 => IpAddr::V6(Ipv6Addr::from(bits)),
    }
}

/// A CIDR block. The base address never carries host bits.
///
/// Ordering is IPv4 before IPv6, then numeric base address, then prefix length,
/// so a supernet sorts directly before the blocks it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prefix {
    addr: IpAddr,
    len: u8,
}

impl Prefix {
    /// Build a prefix, clearing any host bits in `addr`.
    pub fn new(addr: IpAddr, len: u8) -> Result<Prefix, PrefixError> {
        let max_len = IpVersion::of(&addr).max_length();
        if len > max_len {
            return Err(PrefixError::invalid(
                &format!("{addr}/{len}"),
                format!("prefix length {len} > {max_len}"),
            ));
        }
        Ok(Prefix::from_bits(IpVersion::of(&addr), addr_bits(addr), len))
    }

    /// Host route (/32 or /128) for a single address.
    pub fn host(addr: IpAddr) -> Prefix {
        Prefix {
            addr,
            len: IpVersion::of(&addr).max_length(),
        }
    }

    fn from_bits(version: IpVersion, bits: u128, len: u8) -> Prefix {
        let mask = get_cidr_mask(len, version.max_length());
        Prefix {
            addr: addr_from_bits(version, bits & mask),
            len,
        }
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    /// Prefix length (0-32 or 0-128).
    pub fn prefix_len(&self) -> u8 {
        self.len
    }

    pub fn version(&self) -> IpVersion {
        IpVersion::of(&self.addr)
    }

    pub fn is_ipv4(&self) -> bool {
        self.addr.is_ipv4()
    }

    fn mask(&self) -> u128 {
        get_cidr_mask(self.len, self.version().max_length())
    }

    /// Lowest (network) address as an integer.
    pub fn lo_bits(&self) -> u128 {
        addr_bits(self.addr)
    }

    /// Highest (broadcast) address as an integer.
    pub fn hi_bits(&self) -> u128 {
        let all_bits = get_cidr_mask(self.version().max_length(), self.version().max_length());
        self.lo_bits() | (!self.mask() & all_bits)
    }

    /// Lowest (network) address in the block.
    pub fn lo(&self) -> IpAddr {
        self.addr
    }

    /// Highest (broadcast) address in the block.
    pub fn hi(&self) -> IpAddr {
        addr_from_bits(self.version(), self.hi_bits())
    }

    /// True when every address of `other` lies inside `self`.
    pub fn contains(&self, other: &Prefix) -> bool {
        self.version() == other.version()
            && self.len <= other.len
            && other.lo_bits() & self.mask() == self.lo_bits()
    }

    /// True when the two blocks overlap at all. For CIDR blocks this means one
    /// contains the other.
    pub fn overlaps(&self, other: &Prefix) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// True when `self` and `other` are the two halves of the same parent block.
    pub fn is_sibling(&self, other: &Prefix) -> bool {
        if self.version() != other.version() || self.len != other.len || self.len == 0 {
            return false;
        }
        let half_bit = 1u128 << (self.version().max_length() - self.len);
        self.lo_bits() ^ other.lo_bits() == half_bit
    }

    /// The one-bit-shorter block containing `self`, or `None` for a /0.
    pub fn supernet(&self) -> Option<Prefix> {
        if self.len == 0 {
            return None;
        }
        Some(Prefix::from_bits(
            self.version(),
            self.lo_bits(),
            self.len - 1,
        ))
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.len)
    }
}

impl FromStr for Prefix {
    type Err = PrefixError;

    fn from_str(s: &str) -> Result<Prefix, PrefixError> {
        crate::processing::parse_prefix(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Prefix {
        s.parse().unwrap()
    }

    #[test]
    fn test_get_cidr_mask() {
        assert_eq!(get_cidr_mask(0, 32), 0x00000000);
        assert_eq!(get_cidr_mask(8, 32), 0xFF000000);
        assert_eq!(get_cidr_mask(16, 32), 0xFFFF0000);
        assert_eq!(get_cidr_mask(24, 32), 0xFFFFFF00);
        assert_eq!(get_cidr_mask(32, 32), 0xFFFFFFFF);
        assert_eq!(get_cidr_mask(0, 128), 0);
        assert_eq!(get_cidr_mask(128, 128), u128::MAX);
        assert_eq!(get_cidr_mask(64, 128), u128::MAX << 64);
    }

    #[test]
    fn test_new_clears_host_bits() {
        let pfx = Prefix::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 42)), 24).unwrap();
        assert_eq!(pfx.to_string(), "192.168.1.0/24");
        assert_eq!(p("2001:db8::1/32").to_string(), "2001:db8::/32");
        assert_eq!(p("10.1.2.3/0").to_string(), "0.0.0.0/0");
    }

    #[test]
    fn test_new_rejects_long_mask() {
        assert!(Prefix::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 0)), 33).is_err());
        assert!(Prefix::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 129).is_err());
        assert!(Prefix::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 128).is_ok());
    }

    #[test]
    fn test_lo_hi() {
        let pfx = p("10.0.0.0/8");
        assert_eq!(pfx.lo(), IpAddr::V4(Ipv4Addr::new(10, 0, 0, 0)));
        assert_eq!(pfx.hi(), IpAddr::V4(Ipv4Addr::new(10, 255, 255, 255)));
        assert_eq!(p("0.0.0.0/0").hi_bits(), u128::from(u32::MAX));
        assert_eq!(p("::/0").hi_bits(), u128::MAX);
        assert_eq!(p("1.2.3.4/32").hi(), p("1.2.3.4/32").lo());
    }

    #[test]
    fn test_prefix_cmp() {
        assert!(p("10.0.0.0/8") < p("10.0.10.0/24"));
        assert!(p("10.0.10.0/24") < p("10.0.10.0/26"));
        assert!(p("10.0.10.64/26") > p("10.0.10.0/24"));
        assert!(p("255.255.255.255/32") < p("::/0"));
        assert_eq!(p("10.0.0.1/24"), p("10.0.0.0/24"));
    }

    #[test]
    fn test_contains() {
        assert!(p("10.0.0.0/8").contains(&p("10.20.0.0/16")));
        assert!(p("10.0.0.0/8").contains(&p("10.0.0.0/8")));
        assert!(!p("10.20.0.0/16").contains(&p("10.0.0.0/8")));
        assert!(!p("10.0.0.0/24").contains(&p("10.0.1.0/24")));
        assert!(!p("0.0.0.0/0").contains(&p("::/128")));
        assert!(p("::/0").contains(&p("2001:db8::/32")));
        assert!(p("10.0.0.0/23").overlaps(&p("10.0.1.0/24")));
        assert!(!p("10.0.0.0/24").overlaps(&p("10.0.1.0/24")));
    }

    #[test]
    fn test_is_sibling() {
        assert!(p("10.0.0.0/24").is_sibling(&p("10.0.1.0/24")));
        assert!(p("10.0.1.0/24").is_sibling(&p("10.0.0.0/24")));
        // adjacent but belonging to different parents
        assert!(!p("10.0.1.0/24").is_sibling(&p("10.0.2.0/24")));
        assert!(!p("10.0.0.0/24").is_sibling(&p("10.0.1.0/25")));
        assert!(!p("0.0.0.0/0").is_sibling(&p("0.0.0.0/0")));
        assert!(p("2001:db8::/33").is_sibling(&p("2001:db8:8000::/33")));
    }

    #[test]
    fn test_supernet() {
        assert_eq!(p("10.0.1.0/24").supernet(), Some(p("10.0.0.0/23")));
        assert_eq!(p("128.0.0.0/1").supernet(), Some(p("0.0.0.0/0")));
        assert_eq!(p("0.0.0.0/0").supernet(), None);
        assert_eq!(p("::1/128").supernet(), Some(p("::/127")));
    }
}
