//! IPv6 CIDR arithmetic
//!
//! - [`Ipv6Block`]: address block value object
//! - [`compute_subnet_block`]: derive a /64 subnet from a /56 parent

pub mod allocator;
pub mod block;

pub use allocator::{
    MAX_SUBNET_INDEX, PARENT_PREFIX, SUBNET_PREFIX, compute_subnet_block, compute_subnet_cidr,
};
pub use block::Ipv6Block;
