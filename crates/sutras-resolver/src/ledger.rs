//! Constraint bookkeeping for conflict reporting.

use std::collections::BTreeMap;
use std::fmt;

/// One constraint applied to a skill, and who applied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub source: String,
    pub constraint: String,
}

/// Every constraint recorded for every skill during one resolution, in the
/// order they were encountered.
///
/// Entries are never removed, so a conflict can cite all of them.
#[derive(Debug, Clone, Default)]
pub struct ConstraintLedger {
    entries: BTreeMap<String, Vec<LedgerEntry>>,
}

impl ConstraintLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `source requires name at constraint`.
    pub fn record(&mut self, name: &str, source: &str, constraint: &str) {
        self.entries
            .entry(name.to_string())
            .or_default()
            .push(LedgerEntry {
                source: source.to_string(),
                constraint: constraint.to_string(),
            });
    }

    /// Constraints recorded for `name`, oldest first.
    pub fn entries(&self, name: &str) -> &[LedgerEntry] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(source, constraint)` pairs for `name`, oldest first.
    pub fn pairs(&self, name: &str) -> Vec<(String, String)> {
        self.entries(name)
            .iter()
            .map(|e| (e.source.clone(), e.constraint.clone()))
            .collect()
    }

    /// Skill names with at least one constraint, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for ConstraintLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return write!(f, "No constraints recorded.");
        }
        for (name, entries) in &self.entries {
            writeln!(f, "{name}:")?;
            for e in entries {
                writeln!(f, "  {} requires {}", e.source, e.constraint)?;
            }
        }
        Ok(())
    }
}
