//! Shared utilities for the Sutras skill manager.
//!
//! This crate provides cross-cutting concerns used by all other Sutras crates:
//! the unified error type, filesystem helpers, SHA-256 hashing, and terminal
//! status output.

pub mod errors;
pub mod fs;
pub mod hash;
pub mod progress;
