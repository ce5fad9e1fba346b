//! Core data types for the Sutras skill manager.
//!
//! This crate defines the fundamental types that describe a skill project:
//! skill naming rules, dependency declarations, the `skill.toml` manifest,
//! the `sutras.lock` lockfile, and global configuration.
//!
//! This crate is intentionally free of resolution logic and registry I/O.

pub mod config;
pub mod dependency;
pub mod lockfile;
pub mod manifest;
pub mod naming;
