//! Local skill registries: directory layout, version index, artifact cache
//! and checksum verification.

pub mod cache;
pub mod checksum;
pub mod index;
pub mod local;
pub mod repository;

pub use local::LocalRegistry;
