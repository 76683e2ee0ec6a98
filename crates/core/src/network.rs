//! Network value objects: CIDR ranges and remote host addresses.

use core::str::FromStr;
use std::net::IpAddr;

use thiserror::Error;

use crate::ValueObject;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CidrParseError {
    #[error("invalid address '{0}'")]
    Address(String),

    #[error("invalid prefix length '{0}'")]
    Prefix(String),
}

/// A v4 or v6 network prefix.
///
/// The stored network address always has its host bits cleared, so two ranges
/// written differently (`10.1.0.0/8`, `10.0.0.0/8`) compare equal.
///
/// A range inside `::ffff:0:0/96` is stored as the IPv4 range it maps
/// (`::ffff:10.0.0.0/104` is `10.0.0.0/8`), matching how remote hosts are
/// canonicalized.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CidrRange {
    network: IpAddr,
    prefix_len: u8,
}

impl CidrRange {
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self, CidrParseError> {
        if prefix_len > max_prefix(addr) {
            return Err(CidrParseError::Prefix(prefix_len.to_string()));
        }
        if let IpAddr::V6(v6) = addr {
            if let Some(v4) = v6.to_ipv4_mapped().filter(|_| prefix_len >= 96) {
                return Self::new(IpAddr::V4(v4), prefix_len - 96);
            }
        }
        Ok(Self {
            network: mask(addr, prefix_len),
            prefix_len,
        })
    }

    /// A range containing exactly one address.
    pub fn host(addr: IpAddr) -> Self {
        let addr = addr.to_canonical();
        Self {
            network: addr,
            prefix_len: max_prefix(addr),
        }
    }

    pub fn network(&self) -> IpAddr {
        self.network
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    /// Containment test. Addresses of the other family never match; an
    /// IPv4-mapped IPv6 address is tested as IPv4.
    pub fn contains(&self, addr: IpAddr) -> bool {
        let addr = addr.to_canonical();
        match (self.network, addr) {
            (IpAddr::V4(_), IpAddr::V4(_)) | (IpAddr::V6(_), IpAddr::V6(_)) => {
                mask(addr, self.prefix_len) == self.network
            }
            _ => false,
        }
    }
}

impl ValueObject for CidrRange {}

impl FromStr for CidrRange {
    type Err = CidrParseError;

    /// Accepts `addr/prefix` as well as a bare address (host range).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr, prefix) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, Some(prefix)),
            None => (s, None),
        };

        let addr =
            IpAddr::from_str(addr).map_err(|_| CidrParseError::Address(addr.to_string()))?;

        match prefix {
            None => Ok(Self::host(addr)),
            Some(p) => {
                let len = p
                    .parse::<u8>()
                    .map_err(|_| CidrParseError::Prefix(p.to_string()))?;
                Self::new(addr, len)
            }
        }
    }
}

impl core::fmt::Display for CidrRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

fn max_prefix(addr: IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

fn mask(addr: IpAddr, prefix_len: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let bits = u32::MAX
                .checked_shl(32 - u32::from(prefix_len))
                .unwrap_or(0);
            IpAddr::V4((u32::from(v4) & bits).into())
        }
        IpAddr::V6(v6) => {
            let bits = u128::MAX
                .checked_shl(128 - u32::from(prefix_len))
                .unwrap_or(0);
            IpAddr::V6((u128::from(v6) & bits).into())
        }
    }
}

/// One entry of a role's allowed-network list, as received.
///
/// Malformed entries are kept rather than dropped: a list whose every entry is
/// broken must still restrict the role, not collapse into "no restriction".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkEntry {
    Range(CidrRange),
    Malformed(String),
}

impl NetworkEntry {
    pub fn parse(raw: &str) -> Self {
        match CidrRange::from_str(raw) {
            Ok(range) => Self::Range(range),
            Err(_) => Self::Malformed(raw.to_string()),
        }
    }
}

impl ValueObject for NetworkEntry {}

/// Remote host of a login attempt, as supplied by the host stack.
///
/// Hosts may hand us a hostname or an empty string; only an address that parses
/// is ever tested against a network range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteHost(String);

impl RemoteHost {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parsed address, with IPv4-mapped IPv6 folded back to IPv4.
    pub fn ip(&self) -> Option<IpAddr> {
        let raw = self.0.trim();
        let raw = raw
            .strip_prefix('[')
            .and_then(|r| r.strip_suffix(']'))
            .unwrap_or(raw);
        IpAddr::from_str(raw).ok().map(|ip| ip.to_canonical())
    }

    pub fn is_loopback(&self) -> bool {
        self.ip().is_some_and(|ip| ip.is_loopback())
    }
}

impl ValueObject for RemoteHost {}

impl core::fmt::Display for RemoteHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RemoteHost {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RemoteHost {
    fn from(value: String) -> Self {
        Self(value)
    }
}
