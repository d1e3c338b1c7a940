//! Configuration types for infrakit
//!
//! This module defines the declarative description of VPC layouts and edge
//! functions, as loaded from a JSON file.
//!
//! ```json
//! {
//!   "vpc": { "name": "main", "ipv6_cidr": "2a05:d024:5a::/56" },
//!   "functions": [
//!     {
//!       "name": "site-request",
//!       "stage": "viewer-request",
//!       "handlers": [
//!         { "name": "basicAuthHandler", "replacements": { "__BASIC_AUTH__": "dTpw" } },
//!         { "name": "indexRewriteHandler" }
//!       ]
//!     }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::cidr::{Ipv6Block, PARENT_PREFIX};
use crate::edge::{Handler, HandlerChain, Stage};
use crate::vpc::{DEFAULT_IPV4_MASK_BITS, IPV4_MASK_BITS_RANGE, SUPPORTED_ZONES};

/// Main infrakit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfraConfig {
    /// Optional VPC layout
    #[serde(default)]
    pub vpc: Option<VpcConfig>,

    /// Edge functions to compile
    #[serde(default)]
    pub functions: Vec<EdgeFunctionConfig>,
}

impl InfraConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self, crate::Error> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if let Some(vpc) = &self.vpc {
            vpc.validate()?;
        }

        let mut names = HashSet::new();
        for function in &self.functions {
            function.validate()?;
            if !names.insert(function.name.as_str()) {
                return Err(crate::Error::config(format!(
                    "Edge function '{}' defined twice",
                    function.name
                )));
            }
        }

        Ok(())
    }

    /// Find an edge function by name
    pub fn function(&self, name: &str) -> Option<&EdgeFunctionConfig> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// VPC layout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VpcConfig {
    /// VPC name, prefix of all subnet names
    pub name: String,

    /// IPv6 block assigned to the VPC (must be a /56)
    pub ipv6_cidr: Ipv6Block,

    /// IPv4 subnet mask bits (20-24)
    #[serde(default = "default_ipv4_mask_bits")]
    pub ipv4_mask_bits: u8,

    /// Availability zone suffixes
    #[serde(default = "default_zones")]
    pub zones: Vec<char>,
}

impl VpcConfig {
    /// Create a VPC configuration with default mask bits and zones
    pub fn new(name: impl Into<String>, ipv6_cidr: Ipv6Block) -> Self {
        Self {
            name: name.into(),
            ipv6_cidr,
            ipv4_mask_bits: default_ipv4_mask_bits(),
            zones: default_zones(),
        }
    }

    /// Set the IPv4 mask bits
    pub fn with_ipv4_mask_bits(mut self, mask_bits: u8) -> Self {
        self.ipv4_mask_bits = mask_bits;
        self
    }

    /// Set the availability zones
    pub fn with_zones(mut self, zones: impl IntoIterator<Item = char>) -> Self {
        self.zones = zones.into_iter().collect();
        self
    }

    /// Validate the VPC configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.name.is_empty() {
            return Err(crate::Error::config("VPC name cannot be empty"));
        }

        if self.ipv6_cidr.prefix_length() != PARENT_PREFIX {
            return Err(crate::Error::config(format!(
                "VPC IPv6 block must be a /{}, got {}",
                PARENT_PREFIX, self.ipv6_cidr
            )));
        }

        if !IPV4_MASK_BITS_RANGE.contains(&self.ipv4_mask_bits) {
            return Err(crate::Error::config(format!(
                "ipv4_mask_bits must be between 20 and 24, got {}",
                self.ipv4_mask_bits
            )));
        }

        if self.zones.is_empty() {
            return Err(crate::Error::config("At least one zone is required"));
        }

        if let Some(zone) = self.zones.iter().find(|z| !SUPPORTED_ZONES.contains(*z)) {
            return Err(crate::Error::config(format!(
                "Zone '{}' is not supported (expected a, b or c)",
                zone
            )));
        }

        let mut seen = HashSet::new();
        if let Some(zone) = self.zones.iter().find(|z| !seen.insert(**z)) {
            return Err(crate::Error::config(format!("Zone '{}' listed twice", zone)));
        }

        Ok(())
    }
}

/// Edge function configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeFunctionConfig {
    /// Function name
    pub name: String,

    /// Stage the function is attached to
    pub stage: Stage,

    /// Handlers in execution order
    #[serde(default)]
    pub handlers: Vec<Handler>,
}

impl EdgeFunctionConfig {
    /// Validate the function configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.name.is_empty() {
            return Err(crate::Error::config("Edge function name cannot be empty"));
        }

        let mut seen = HashSet::new();
        for handler in &self.handlers {
            handler.validate()?;
            if !seen.insert(handler.name.as_str()) {
                return Err(crate::Error::config(format!(
                    "Handler '{}' listed twice in function '{}'",
                    handler.name, self.name
                )));
            }
        }

        Ok(())
    }

    /// Create an unbuilt chain holding the configured handlers
    pub fn to_chain(&self) -> Result<HandlerChain, crate::Error> {
        let mut chain = HandlerChain::new(&self.name, self.stage);
        for handler in &self.handlers {
            chain.push(handler.clone())?;
        }
        Ok(chain)
    }
}

fn default_ipv4_mask_bits() -> u8 {
    DEFAULT_IPV4_MASK_BITS
}

fn default_zones() -> Vec<char> {
    vec!['a', 'b', 'c']
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "vpc": { "name": "main", "ipv6_cidr": "2a05:d024:5a::/56" },
        "functions": [
            {
                "name": "site-request",
                "stage": "viewer-request",
                "handlers": [
                    { "name": "basicAuthHandler", "replacements": { "__BASIC_AUTH__": "dTpw" } },
                    { "name": "indexRewriteHandler" }
                ]
            },
            { "name": "site-response", "stage": "viewer-response" }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let config = InfraConfig::from_json(SAMPLE).unwrap();
        config.validate().unwrap();

        let vpc = config.vpc.as_ref().unwrap();
        assert_eq!(vpc.ipv4_mask_bits, 22);
        assert_eq!(vpc.zones, ['a', 'b', 'c']);

        let request = config.function("site-request").unwrap();
        assert_eq!(request.stage, Stage::ViewerRequest);
        assert_eq!(request.handlers.len(), 2);
        assert_eq!(request.handlers[0].replacements["__BASIC_AUTH__"], "dTpw");

        assert!(config.function("site-response").unwrap().handlers.is_empty());
    }

    #[test]
    fn test_vpc_validation() {
        let block: Ipv6Block = "2a05:d024:5a::/56".parse().unwrap();
        assert!(VpcConfig::new("main", block).validate().is_ok());
        assert!(VpcConfig::new("", block).validate().is_err());
        assert!(VpcConfig::new("main", block).with_ipv4_mask_bits(25).validate().is_err());
        assert!(VpcConfig::new("main", block).with_zones(['A']).validate().is_err());

        let wide: Ipv6Block = "2a05:d024::/48".parse().unwrap();
        assert!(VpcConfig::new("main", wide).validate().is_err());
    }

    #[test]
    fn test_vpc_zone_validation() {
        let block: Ipv6Block = "2a05:d024:5a::/56".parse().unwrap();

        let fourth = VpcConfig::new("main", block).with_zones(['a', 'b', 'c', 'd']);
        assert!(matches!(fourth.validate(), Err(crate::Error::Config(_))));

        let repeated = VpcConfig::new("main", block).with_zones(['a', 'b', 'a']);
        assert!(matches!(repeated.validate(), Err(crate::Error::Config(_))));

        assert!(VpcConfig::new("main", block).with_zones(['c', 'a']).validate().is_ok());
    }

    #[test]
    fn test_duplicate_function_names() {
        let config = InfraConfig::from_json(
            r#"{"functions": [
                {"name": "f", "stage": "viewer-request"},
                {"name": "f", "stage": "viewer-response"}
            ]}"#,
        )
        .unwrap();
        assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_unknown_stage_rejected() {
        let result =
            InfraConfig::from_json(r#"{"functions": [{"name": "f", "stage": "origin-request"}]}"#);
        assert!(matches!(result, Err(crate::Error::Json(_))));
    }

    #[test]
    fn test_to_chain() {
        let config = InfraConfig::from_json(SAMPLE).unwrap();
        let chain = config.function("site-request").unwrap().to_chain().unwrap();
        assert_eq!(chain.name(), "site-request");
        assert_eq!(chain.handlers().len(), 2);
    }
}
