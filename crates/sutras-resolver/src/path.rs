//! The chain of skills currently being expanded.

use std::collections::HashSet;

/// Names on the current traversal path, outermost first.
///
/// A name appears at most once; re-entering one is a cycle.
#[derive(Debug, Default)]
pub struct PathStack {
    stack: Vec<String>,
    members: HashSet<String>,
}

impl PathStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `name`. Returns `false` (and leaves the stack unchanged) if it is
    /// already on the path.
    pub fn push(&mut self, name: &str) -> bool {
        if !self.members.insert(name.to_string()) {
            return false;
        }
        self.stack.push(name.to_string());
        true
    }

    /// Pop the innermost name.
    pub fn pop(&mut self) -> Option<String> {
        let name = self.stack.pop()?;
        self.members.remove(&name);
        Some(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains(name)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The current path with `name` appended, as reported for a cycle.
    pub fn cycle_through(&self, name: &str) -> Vec<String> {
        let mut cycle = self.stack.clone();
        cycle.push(name.to_string());
        cycle
    }
}
