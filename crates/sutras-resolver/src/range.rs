//! Version constraint parsing and matching.
//!
//! Supported forms: `1.2.3` (exact), `^1.2.3`, `~1.2.3`, `>=1.0.0`, `<2.0.0`,
//! `>=1.0.0 <2.0.0` (all comparators must hold), `1.x`, `1.2.*`, and `*` or
//! the empty string for any version.

use std::fmt;
use std::str::FromStr;

use sutras_util::errors::{SutrasError, SutrasResult};

use crate::version::{parse_version, Version};

/// Comparison operator of a single comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    GreaterOrEqual,
    Less,
}

impl Op {
    fn as_str(self) -> &'static str {
        match self {
            Op::GreaterOrEqual => ">=",
            Op::Less => "<",
        }
    }
}

/// `>=V` or `<V`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Comparator {
    pub op: Op,
    pub version: Version,
}

impl Comparator {
    pub fn matches(&self, version: &Version) -> bool {
        match self.op {
            Op::GreaterOrEqual => version >= &self.version,
            Op::Less => version < &self.version,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.as_str(), self.version)
    }
}

/// A parsed version constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionRange {
    Exact(Version),
    /// Compatible updates: the left-most non-zero component is fixed.
    Caret(Version),
    /// Patch-level updates within the same minor.
    Tilde(Version),
    Comparator(Comparator),
    Compound(Vec<Comparator>),
    /// Fixed major (and optionally minor), anything below it.
    Wildcard { major: u64, minor: Option<u64> },
    Any,
}

impl VersionRange {
    /// Parse a constraint string. See [`parse_constraint`].
    pub fn parse(input: &str) -> SutrasResult<Self> {
        parse_constraint(input)
    }

    /// Whether `version` satisfies this constraint.
    pub fn matches(&self, version: &Version) -> bool {
        match self {
            VersionRange::Exact(v) => version == v,
            VersionRange::Caret(base) => version >= base && version < &caret_upper(base),
            VersionRange::Tilde(base) => {
                let upper = Version::new(base.major, base.minor.saturating_add(1), 0);
                version >= base && version < &upper
            }
            VersionRange::Comparator(c) => c.matches(version),
            VersionRange::Compound(all) => all.iter().all(|c| c.matches(version)),
            VersionRange::Wildcard { major, minor } => {
                version.major == *major && minor.map_or(true, |m| version.minor == m)
            }
            VersionRange::Any => true,
        }
    }

    /// The highest candidate satisfying this constraint.
    pub fn select_highest<'a, I>(&self, candidates: I) -> Option<Version>
    where
        I: IntoIterator<Item = &'a Version>,
    {
        candidates
            .into_iter()
            .filter(|v| self.matches(v))
            .max()
            .cloned()
    }
}

fn caret_upper(base: &Version) -> Version {
    if base.major > 0 {
        Version::new(base.major.saturating_add(1), 0, 0)
    } else if base.minor > 0 {
        Version::new(0, base.minor.saturating_add(1), 0)
    } else {
        Version::new(0, 0, base.patch.saturating_add(1))
    }
}

/// Parse a constraint string into a [`VersionRange`].
///
/// Malformed input, including a malformed version after `^`, `~` or a
/// comparator, fails with [`SutrasError::InvalidConstraintFormat`] citing
/// the whole constraint.
pub fn parse_constraint(input: &str) -> SutrasResult<VersionRange> {
    let invalid = || SutrasError::InvalidConstraintFormat {
        constraint: input.to_string(),
    };

    let s = input.trim();
    if s.is_empty() || s == "*" {
        return Ok(VersionRange::Any);
    }

    if let Some(rest) = s.strip_prefix('^') {
        return release_version(rest)
            .map(VersionRange::Caret)
            .ok_or_else(invalid);
    }
    if let Some(rest) = s.strip_prefix('~') {
        return release_version(rest)
            .map(VersionRange::Tilde)
            .ok_or_else(invalid);
    }

    if s.starts_with(">=") || s.starts_with('<') {
        let mut comparators = s
            .split_whitespace()
            .map(parse_comparator)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;
        return Ok(if comparators.len() == 1 {
            VersionRange::Comparator(comparators.remove(0))
        } else {
            VersionRange::Compound(comparators)
        });
    }

    if let Some(range) = parse_wildcard(s) {
        return Ok(range);
    }

    parse_version(s)
        .map(VersionRange::Exact)
        .map_err(|_| invalid())
}

/// `X.Y.Z` without a prerelease tag.
fn release_version(s: &str) -> Option<Version> {
    parse_version(s).ok().filter(|v| !v.is_prerelease())
}

fn parse_comparator(token: &str) -> Option<Comparator> {
    let (op, rest) = if let Some(rest) = token.strip_prefix(">=") {
        (Op::GreaterOrEqual, rest)
    } else if let Some(rest) = token.strip_prefix('<') {
        (Op::Less, rest)
    } else {
        return None;
    };
    if rest.starts_with(char::is_whitespace) {
        return None;
    }
    let version = parse_version(rest).ok()?;
    Some(Comparator { op, version })
}

/// `1.x`, `1.2.x`, `1.*`, `1.2.*`, `1.x.x`, `x`.
///
/// Returns `None` when the input has no free component or is otherwise not
/// a wildcard, so the caller can try the other forms.
fn parse_wildcard(s: &str) -> Option<VersionRange> {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() > 3 {
        return None;
    }

    let mut fixed = Vec::new();
    let mut seen_free = false;
    for part in &parts {
        if matches!(*part, "x" | "X" | "*") {
            seen_free = true;
        } else if seen_free {
            return None;
        } else if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
            fixed.push(part.parse::<u64>().ok()?);
        } else {
            return None;
        }
    }
    if !seen_free {
        return None;
    }

    match fixed.as_slice() {
        [] => Some(VersionRange::Any),
        [major] => Some(VersionRange::Wildcard {
            major: *major,
            minor: None,
        }),
        [major, minor] => Some(VersionRange::Wildcard {
            major: *major,
            minor: Some(*minor),
        }),
        _ => None,
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionRange::Exact(v) => write!(f, "{v}"),
            VersionRange::Caret(v) => write!(f, "^{v}"),
            VersionRange::Tilde(v) => write!(f, "~{v}"),
            VersionRange::Comparator(c) => write!(f, "{c}"),
            VersionRange::Compound(all) => {
                let parts: Vec<String> = all.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(" "))
            }
            VersionRange::Wildcard { major, minor: None } => write!(f, "{major}.x"),
            VersionRange::Wildcard {
                major,
                minor: Some(minor),
            } => write!(f, "{major}.{minor}.x"),
            VersionRange::Any => f.write_str("*"),
        }
    }
}

impl FromStr for VersionRange {
    type Err = SutrasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_constraint(s)
    }
}

/// Check a version string against a constraint string.
///
/// Both must parse; use [`select_version`] to skip bad candidates instead.
pub fn matches_constraint(version: &str, constraint: &str) -> SutrasResult<bool> {
    let range = parse_constraint(constraint)?;
    let version = parse_version(version)?;
    Ok(range.matches(&version))
}

/// Pick the highest candidate satisfying `constraint`, rendered in canonical
/// form (`v1.5.0` comes back as `1.5.0`).
///
/// Candidates that do not parse as versions are skipped.
pub fn select_version<S: AsRef<str>>(
    candidates: &[S],
    constraint: &str,
) -> SutrasResult<Option<String>> {
    let range = parse_constraint(constraint)?;
    let parsed: Vec<Version> = candidates
        .iter()
        .filter_map(|raw| {
            let raw = raw.as_ref();
            parse_version(raw)
                .map_err(|_| tracing::debug!("skipping unparseable version '{raw}'"))
                .ok()
        })
        .collect();
    Ok(range.select_highest(&parsed).map(|v| v.to_string()))
}
