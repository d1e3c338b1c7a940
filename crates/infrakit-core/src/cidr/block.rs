//! IPv6 network block value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

use crate::error::{Error, Result};

/// An IPv6 address block in CIDR notation
///
/// Invariants:
/// - Prefix length is within 0-128
/// - The address is kept as given; [`Ipv6Block::network`] clears the host bits
///
/// # Examples
///
/// ```rust
/// use infrakit_core::cidr::Ipv6Block;
///
/// let block: Ipv6Block = "2a05:d024:5a::/56".parse().unwrap();
/// assert_eq!(block.prefix_length(), 56);
/// assert_eq!(block.to_string(), "2a05:d024:5a::/56");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ipv6Block {
    address: Ipv6Addr,
    prefix_length: u8,
}

impl Ipv6Block {
    /// Largest valid prefix length
    pub const MAX_PREFIX: u8 = 128;

    /// Create a block from an address and prefix length
    pub fn new(address: Ipv6Addr, prefix_length: u8) -> Result<Self> {
        if prefix_length > Self::MAX_PREFIX {
            return Err(Error::invalid_cidr(format!(
                "{}/{}: prefix length must be 0-128",
                address, prefix_length
            )));
        }

        Ok(Self {
            address,
            prefix_length,
        })
    }

    /// Get the address as written
    pub fn address(&self) -> Ipv6Addr {
        self.address
    }

    /// Get the prefix length
    pub fn prefix_length(&self) -> u8 {
        self.prefix_length
    }

    /// Bit mask selecting the network portion
    fn mask(&self) -> u128 {
        match self.prefix_length {
            0 => 0,
            len => u128::MAX << (128 - u32::from(len)),
        }
    }

    /// Get the network address (host bits cleared)
    pub fn network(&self) -> Ipv6Addr {
        Ipv6Addr::from(u128::from(self.address) & self.mask())
    }

    /// Check whether an address falls inside this block
    pub fn contains(&self, address: Ipv6Addr) -> bool {
        u128::from(address) & self.mask() == u128::from(self.network())
    }

    /// Check whether two blocks share any address
    pub fn overlaps(&self, other: &Ipv6Block) -> bool {
        self.contains(other.network()) || other.contains(self.network())
    }
}

impl fmt::Display for Ipv6Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.prefix_length)
    }
}

impl FromStr for Ipv6Block {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (addr_str, prefix_str) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| Error::invalid_cidr(format!("{}: missing prefix length", s)))?;

        let address = Ipv6Addr::from_str(addr_str)
            .map_err(|_| Error::invalid_cidr(format!("{}: not an IPv6 address", s)))?;

        let prefix_length = prefix_str
            .parse::<u8>()
            .map_err(|_| Error::invalid_cidr(format!("{}: bad prefix length", s)))?;

        Self::new(address, prefix_length)
    }
}

impl TryFrom<String> for Ipv6Block {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Ipv6Block> for String {
    fn from(block: Ipv6Block) -> Self {
        block.to_string()
    }
}
