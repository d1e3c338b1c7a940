// # infrakit-core
//
// Pure building blocks for declarative infrastructure code.
//
// ## Overview
//
// - **cidr**: Derive non-overlapping /64 subnets from a /56 IPv6 block
// - **vpc**: Per-zone public/private subnet plan (IPv4 and IPv6)
// - **edge**: Compile chains of edge handlers into one deployable function
// - **catalog**: Where handler source comes from (embedded, directory, memory)
// - **artifact**: Versioned build artifacts based on source-control history
//
// ## Boundaries
//
// Nothing in this crate creates cloud resources. Every operation returns a
// plain value (a CIDR, a source blob, a version string) for the
// infrastructure engine to consume. Apart from catalog file reads, `git log`
// and build commands, all operations are pure and deterministic.

pub mod artifact;
pub mod catalog;
pub mod cidr;
pub mod config;
pub mod edge;
pub mod error;
pub mod traits;
pub mod vpc;

// Re-export core types for convenience
pub use artifact::{Artifact, ArtifactVersion, GitRevisionSource, compute_version};
pub use catalog::{BuiltinCatalog, DirectoryCatalog, MemoryCatalog};
pub use cidr::{Ipv6Block, compute_subnet_block, compute_subnet_cidr};
pub use config::{EdgeFunctionConfig, InfraConfig, VpcConfig};
pub use edge::{CompiledFunction, Handler, HandlerChain, Stage, compile};
pub use error::{Error, Result};
pub use traits::{HandlerSource, RevisionSource};
pub use vpc::{SubnetPlan, SubnetTier, plan_subnets};
