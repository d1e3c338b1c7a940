// # VPC Subnet Layout
//
// Computes the subnets of a VPC with one public and one private subnet per
// availability zone.
//
// ## Index Assignment
//
// Public subnets take the zone's position in the alphabet (a -> 0, b -> 1),
// private subnets are shifted by three (a -> 3, b -> 4). The same index is
// used for the IPv4 block inside 10.0.0.0/16 and for the IPv6 /64 inside the
// VPC's /56. The shift limits a VPC to zones a-c; a fourth zone would share
// its public index with the first private one.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::cidr::{Ipv6Block, compute_subnet_block};
use crate::error::{Error, Result};

/// IPv4 block of every VPC
pub const VPC_IPV4_CIDR: &str = "10.0.0.0/16";

/// Default IPv4 subnet mask bits
pub const DEFAULT_IPV4_MASK_BITS: u8 = 22;

/// Accepted IPv4 subnet mask bits
pub const IPV4_MASK_BITS_RANGE: std::ops::RangeInclusive<u8> = 20..=24;

/// Offset between a zone's public and private subnet index
const PRIVATE_INDEX_OFFSET: u32 = 3;

/// Zone suffixes with their own public and private index
pub const SUPPORTED_ZONES: std::ops::RangeInclusive<char> = 'a'..='c';

/// Compute the IPv4 CIDR of a subnet inside `10.0.0.0/16`
///
/// ```text
/// mask 24 -> third octet step 1
/// mask 22 -> third octet step 4
/// mask 20 -> third octet step 16
/// ```
pub fn compute_subnet_ipv4_cidr(mask_bits: u8, subnet_index: u32) -> Result<String> {
    if !IPV4_MASK_BITS_RANGE.contains(&mask_bits) {
        return Err(Error::UnsupportedMaskBits(mask_bits));
    }

    let step = 1u32 << (24 - mask_bits);
    let max = 255 / step;
    if subnet_index > max {
        return Err(Error::SubnetIndexOutOfRange {
            index: subnet_index,
            max,
        });
    }

    Ok(format!("10.0.{}.0/{}", subnet_index * step, mask_bits))
}

/// Whether a subnet can be reached from the internet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubnetTier {
    /// Routed through the internet gateway (IPv4 and IPv6)
    Public,
    /// IPv6 egress only
    Private,
}

impl SubnetTier {
    /// Get the tier name used in subnet names
    pub fn as_str(&self) -> &'static str {
        match self {
            SubnetTier::Public => "public",
            SubnetTier::Private => "private",
        }
    }
}

impl fmt::Display for SubnetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned subnet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetPlan {
    /// Subnet name, `{vpc}-{zone}-{tier}`
    pub name: String,
    /// Availability zone suffix (e.g. `a`)
    pub zone: char,
    /// Public or private
    pub tier: SubnetTier,
    /// Index shared by the IPv4 and IPv6 allocation
    pub index: u32,
    /// IPv4 CIDR inside 10.0.0.0/16
    pub ipv4_cidr: String,
    /// IPv6 /64 inside the VPC block
    pub ipv6_cidr: Ipv6Block,
}

/// Compute the subnet index of a zone and tier
pub fn subnet_index(zone: char, tier: SubnetTier) -> Result<u32> {
    if !SUPPORTED_ZONES.contains(&zone) {
        return Err(Error::invalid_input(format!(
            "Availability zone suffix must be one of a, b, c, got '{}'",
            zone
        )));
    }

    let base = u32::from(zone) - u32::from('a');
    Ok(match tier {
        SubnetTier::Public => base,
        SubnetTier::Private => base + PRIVATE_INDEX_OFFSET,
    })
}

/// Plan the public and private subnets of a VPC
///
/// Public subnets for all zones come first, followed by the private ones,
/// each group in the given zone order.
///
/// # Errors
///
/// - duplicate zones or zones outside a-c
/// - unsupported mask bits or a parent block that is not a /56
/// - zones whose index does not fit the IPv4 layout
pub fn plan_subnets(
    vpc_name: &str,
    ipv6_parent: &Ipv6Block,
    ipv4_mask_bits: u8,
    zones: &[char],
) -> Result<Vec<SubnetPlan>> {
    if vpc_name.is_empty() {
        return Err(Error::invalid_input("VPC name cannot be empty"));
    }

    if zones.is_empty() {
        return Err(Error::invalid_input("At least one availability zone is required"));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = zones.iter().find(|zone| !seen.insert(**zone)) {
        return Err(Error::invalid_input(format!(
            "Availability zone '{}' listed twice",
            dup
        )));
    }

    let mut plans = Vec::with_capacity(zones.len() * 2);
    for tier in [SubnetTier::Public, SubnetTier::Private] {
        for &zone in zones {
            let index = subnet_index(zone, tier)?;
            let plan = SubnetPlan {
                name: format!("{}-{}-{}", vpc_name, zone, tier),
                zone,
                tier,
                index,
                ipv4_cidr: compute_subnet_ipv4_cidr(ipv4_mask_bits, index)?,
                ipv6_cidr: compute_subnet_block(ipv6_parent, index)?,
            };
            debug!(
                subnet = %plan.name,
                ipv4 = %plan.ipv4_cidr,
                ipv6 = %plan.ipv6_cidr,
                "planned subnet"
            );
            plans.push(plan);
        }
    }

    Ok(plans)
}
