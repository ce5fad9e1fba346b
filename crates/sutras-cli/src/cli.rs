//! CLI argument definitions for Sutras.
//!
//! Uses `clap` derive macros to define the command surface. Each command
//! corresponds to a handler in the [`super::commands`] module.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "sutras",
    version,
    about = "Dependency resolution for skill packages",
    long_about = "Sutras resolves the dependencies declared in skill.toml against local \
                  skill registries, records them in sutras.lock and fetches their archives."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve dependencies and print the install order
    Resolve {
        /// Print the resolved skills as JSON
        #[arg(long)]
        json: bool,
        /// Ignore versions pinned in sutras.lock
        #[arg(long)]
        no_lock: bool,
    },

    /// Re-resolve from scratch and rewrite sutras.lock
    Lock,

    /// Display the dependency tree
    Tree {
        /// Maximum depth to display
        #[arg(short, long)]
        depth: Option<usize>,
        /// Show why a skill is included
        #[arg(long, conflicts_with = "inverted")]
        why: Option<String>,
        /// Show everything that depends on a skill
        #[arg(long)]
        inverted: Option<String>,
    },

    /// Copy every resolved skill archive into the cache
    Fetch,

    /// Validate skill.toml
    Check,

    /// Manage skill registries
    Registry {
        #[command(subcommand)]
        action: RegistryAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum RegistryAction {
    /// Add or replace a registry
    Add {
        /// Registry name
        name: String,
        /// Local path or file:// URL of the registry root
        url: String,
        /// Only serve skills in this namespace
        #[arg(long)]
        namespace: Option<String>,
        /// Search priority; higher is searched first
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        priority: i32,
        /// Make this the default registry
        #[arg(long)]
        default: bool,
    },
    /// Remove a registry
    Remove {
        /// Registry name
        name: String,
    },
    /// List configured registries
    List,
}

/// Parse command-line arguments into a [`Cli`] struct.
pub fn parse() -> Cli {
    Cli::parse()
}
