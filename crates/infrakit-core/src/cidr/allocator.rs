// # Subnet Allocator
//
// Carves /64 subnets out of a /56 parent block.
//
// ## Layout
//
// ```text
//  0                              56        64                            128
//  ├──────── parent network ──────┼─ index ─┼────────── interface id ───────┤
// ```
//
// The subnet index occupies bits 56-63, so a parent holds exactly 256
// subnets. Indices outside that field are rejected instead of spilling into
// the parent's network bits.

use std::net::Ipv6Addr;
use tracing::debug;

use super::block::Ipv6Block;
use crate::error::{Error, Result};

/// Prefix length accepted for parent blocks
pub const PARENT_PREFIX: u8 = 56;

/// Prefix length of every derived subnet
pub const SUBNET_PREFIX: u8 = 64;

/// Largest subnet index that fits between the parent and subnet prefixes
pub const MAX_SUBNET_INDEX: u32 = (1 << (SUBNET_PREFIX - PARENT_PREFIX)) - 1;

/// Compute the /64 subnet with the given index inside a /56 parent block
///
/// The function is pure: the same parent and index always give the same
/// block, and distinct indices give non-overlapping blocks.
///
/// # Errors
///
/// - [`Error::UnsupportedPrefixLength`] if the parent is not a /56
/// - [`Error::SubnetIndexOutOfRange`] if `subnet_index` exceeds 255
///
/// # Example
///
/// ```rust
/// use infrakit_core::cidr::{compute_subnet_block, Ipv6Block};
///
/// let parent: Ipv6Block = "2a05:d014:a87:1f00::/56".parse().unwrap();
/// let subnet = compute_subnet_block(&parent, 5).unwrap();
/// assert_eq!(subnet.to_string(), "2a05:d014:a87:1f05::/64");
/// ```
pub fn compute_subnet_block(parent: &Ipv6Block, subnet_index: u32) -> Result<Ipv6Block> {
    if parent.prefix_length() != PARENT_PREFIX {
        return Err(Error::UnsupportedPrefixLength(parent.prefix_length()));
    }

    if subnet_index > MAX_SUBNET_INDEX {
        return Err(Error::SubnetIndexOutOfRange {
            index: subnet_index,
            max: MAX_SUBNET_INDEX,
        });
    }

    let network = u128::from(parent.network());
    let subnet = network | (u128::from(subnet_index) << (128 - u32::from(SUBNET_PREFIX)));
    let block = Ipv6Block::new(Ipv6Addr::from(subnet), SUBNET_PREFIX)?;

    debug!(parent = %parent, subnet_index, subnet = %block, "computed subnet block");

    Ok(block)
}

/// Text-level variant of [`compute_subnet_block`]
///
/// Parses `parent_cidr` (e.g. `"2a05:d024:5a::/56"`) and renders the subnet
/// in compact notation (e.g. `"2a05:d024:5a:2::/64"`).
pub fn compute_subnet_cidr(parent_cidr: &str, subnet_index: u32) -> Result<String> {
    let parent: Ipv6Block = parent_cidr.parse()?;
    compute_subnet_block(&parent, subnet_index).map(|block| block.to_string())
}
