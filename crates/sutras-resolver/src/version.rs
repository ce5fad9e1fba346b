//! Semantic version parsing and ordering.
//!
//! Versions are `MAJOR.MINOR.PATCH` with an optional `-prerelease` tag:
//! - The numeric triple compares numerically
//! - At an equal triple, a release sorts after any prerelease of it
//! - Two prerelease tags compare as plain strings (`alpha` < `beta` < `rc.1`)

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sutras_util::errors::{SutrasError, SutrasResult};

/// A parsed semantic version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
}

impl Version {
    /// A release version with no prerelease tag.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    pub fn with_prerelease(mut self, tag: impl Into<String>) -> Self {
        self.prerelease = Some(tag.into());
        self
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Parse a version string. See [`parse_version`].
    pub fn parse(input: &str) -> SutrasResult<Self> {
        parse_version(input)
    }
}

/// Parse `1.2.3`, `v1.2.3` or `1.2.3-alpha.1`.
///
/// Surrounding whitespace is ignored. Anything else fails with
/// [`SutrasError::InvalidVersionFormat`] carrying the input as given.
pub fn parse_version(input: &str) -> SutrasResult<Version> {
    let invalid = || SutrasError::InvalidVersionFormat {
        version: input.to_string(),
    };

    let s = input.trim();
    let s = s.strip_prefix('v').unwrap_or(s);

    let (core, prerelease) = match s.split_once('-') {
        Some((core, tag)) => {
            if tag.is_empty() || !tag.chars().all(is_tag_char) {
                return Err(invalid());
            }
            (core, Some(tag.to_string()))
        }
        None => (s, None),
    };

    let mut parts = core.split('.');
    let (Some(major), Some(minor), Some(patch), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    Ok(Version {
        major: parse_component(major).ok_or_else(invalid)?,
        minor: parse_component(minor).ok_or_else(invalid)?,
        patch: parse_component(patch).ok_or_else(invalid)?,
        prerelease,
    })
}

fn parse_component(part: &str) -> Option<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-'
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(tag) = &self.prerelease {
            write!(f, "-{tag}")?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = SutrasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_version(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_version(&raw).map_err(serde::de::Error::custom)
    }
}
