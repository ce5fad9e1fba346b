use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all Sutras operations.
///
/// The resolution variants carry structured fields so callers can inspect
/// provenance (which source asked for which constraint) without parsing the
/// rendered message.
#[derive(Debug, Error, Diagnostic)]
pub enum SutrasError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unreadable or invalid skill manifest (e.g. skill.toml).
    #[error("Manifest error: {message}")]
    #[diagnostic(help("Check your skill.toml for syntax errors"))]
    Manifest { message: String },

    /// Global configuration could not be read, written or queried.
    #[error("Config error: {message}")]
    Config { message: String },

    /// Lockfile could not be read, parsed or written.
    #[error("Lockfile error: {message}")]
    #[diagnostic(help("Delete sutras.lock and run `sutras lock` to regenerate it"))]
    Lockfile { message: String },

    /// Registry index or artifact problem.
    #[error("Registry error: {message}")]
    Registry { message: String },

    /// A skill name or namespace violates the naming rules.
    #[error("{message}")]
    InvalidName { message: String },

    /// Malformed version string.
    #[error("Invalid version format: '{version}'")]
    #[diagnostic(help("Versions take the form MAJOR.MINOR.PATCH with an optional -prerelease tag"))]
    InvalidVersionFormat { version: String },

    /// Malformed constraint string.
    #[error("Invalid constraint format: '{constraint}'")]
    #[diagnostic(help(
        "Supported forms: 1.2.3, ^1.2.3, ~1.2.3, >=1.0.0 <2.0.0, 1.x, 1.2.*, *"
    ))]
    InvalidConstraintFormat { constraint: String },

    /// A dependency entry in a manifest is missing its name.
    #[error("Invalid dependency entry (missing name): {entry}")]
    InvalidManifest { entry: String },

    /// A skill was re-entered while still being expanded.
    #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    /// No single version satisfies every constraint recorded for a skill.
    #[error("Dependency conflict for '{name}': {}", render_constraints(.constraints))]
    #[diagnostic(help("Relax one of the constraints so a single version satisfies all of them"))]
    DependencyConflict {
        name: String,
        constraints: Vec<(String, String)>,
    },

    /// The registry has no record of the skill at all.
    #[error("Skill '{name}' not found{}", render_wanted(.constraint.as_deref()))]
    SkillNotFound {
        name: String,
        constraint: Option<String>,
    },

    /// The registry knows the skill but no published version matches.
    #[error(
        "No version of '{name}' matches '{constraint}' (available: {})",
        render_available(.available)
    )]
    NoMatchingVersion {
        name: String,
        constraint: String,
        available: Vec<String>,
    },

    /// Traversal went deeper than the configured limit.
    #[error("Dependency chain exceeds maximum depth of {limit} at '{name}'")]
    DepthLimitExceeded { name: String, limit: usize },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias used throughout the library crates.
pub type SutrasResult<T> = std::result::Result<T, SutrasError>;

fn render_constraints(constraints: &[(String, String)]) -> String {
    constraints
        .iter()
        .map(|(source, constraint)| format!("{source} requires {constraint}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_wanted(constraint: Option<&str>) -> String {
    match constraint {
        Some(c) => format!(" (wanted {c})"),
        None => String::new(),
    }
}

fn render_available(available: &[String]) -> String {
    if available.is_empty() {
        "none".to_string()
    } else {
        available.join(", ")
    }
}
