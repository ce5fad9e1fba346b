//! Dependency resolution engine: semantic versions, constraint ranges,
//! greedy depth-first resolution with cycle and conflict detection, and
//! topological install ordering.

pub mod graph;
pub mod ledger;
pub mod path;
pub mod provider;
pub mod range;
pub mod resolver;
pub mod version;

pub use provider::{LockfileProvider, RegistryManifest, RegistryProvider};
pub use range::{matches_constraint, parse_constraint, select_version, VersionRange};
pub use resolver::{Resolution, ResolveOptions, ResolvedSkill, Resolver};
pub use version::{parse_version, Version};
