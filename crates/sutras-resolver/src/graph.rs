//! Dependency graph construction, ordering and traversal.

use std::collections::{HashMap, HashSet};
use std::fmt;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use sutras_util::errors::{SutrasError, SutrasResult};

/// A node in the resolved dependency graph.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct SkillNode {
    pub name: String,
    pub version: String,
}

impl SkillNode {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for SkillNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} v{}", self.name, self.version)
    }
}

/// A resolved dependency graph backed by petgraph.
///
/// Edges point from a dependent to its dependency. The graph may carry a
/// synthetic root node for the project itself; without one, the top-level
/// skills are tracked in [`DependencyGraph::roots`].
pub struct DependencyGraph {
    graph: DiGraph<SkillNode, ()>,
    index: HashMap<String, NodeIndex>,
    pub root: Option<NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
            root: None,
            roots: Vec::new(),
        }
    }

    /// Add or retrieve a node. A name already present keeps its first version.
    pub fn add_node(&mut self, node: SkillNode) -> NodeIndex {
        if let Some(&idx) = self.index.get(&node.name) {
            return idx;
        }
        let name = node.name.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(name, idx);
        idx
    }

    /// Set the root node of the graph (the project itself).
    pub fn set_root(&mut self, idx: NodeIndex) {
        self.root = Some(idx);
    }

    /// Mark a node as requested directly by the project.
    pub fn add_top_level(&mut self, idx: NodeIndex) {
        if let Some(root) = self.root {
            self.add_edge(root, idx);
        }
        if !self.roots.contains(&idx) {
            self.roots.push(idx);
        }
    }

    /// Directly requested nodes, in request order.
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// Add a dependency edge from `from` to `to`.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        if !self.graph.edges(from).any(|e| e.target() == to) {
            self.graph.add_edge(from, to, ());
        }
    }

    /// Look up a node by skill name.
    pub fn find(&self, name: &str) -> Option<NodeIndex> {
        self.index.get(name).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &SkillNode {
        &self.graph[idx]
    }

    /// All skill nodes (excluding root).
    pub fn all_nodes(&self) -> Vec<&SkillNode> {
        self.graph
            .node_indices()
            .filter(|&idx| Some(idx) != self.root)
            .map(|idx| &self.graph[idx])
            .collect()
    }

    /// Direct dependencies of a node, in declaration order.
    pub fn dependencies_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_in_insertion_order(idx, Direction::Outgoing)
    }

    /// Reverse dependencies (who depends on this node).
    pub fn dependents_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.neighbors_in_insertion_order(idx, Direction::Incoming)
    }

    fn neighbors_in_insertion_order(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(idx, dir)
            .map(|e| {
                let other = if dir == Direction::Outgoing {
                    e.target()
                } else {
                    e.source()
                };
                (e.id(), other)
            })
            .collect();
        edges.sort_by_key(|(id, _)| *id);
        edges.into_iter().map(|(_, other)| other).collect()
    }

    /// Nodes ordered so every dependency precedes its dependents (root excluded).
    pub fn install_order(&self) -> SutrasResult<Vec<&SkillNode>> {
        let mut order = toposort(&self.graph, None).map_err(|cycle| {
            let name = self.graph[cycle.node_id()].name.clone();
            SutrasError::CircularDependency {
                cycle: vec![name.clone(), name],
            }
        })?;
        order.reverse();
        Ok(order
            .into_iter()
            .filter(|&idx| Some(idx) != self.root)
            .map(|idx| &self.graph[idx])
            .collect())
    }

    /// Render the dependency tree. Nodes already printed higher up the same
    /// branch are not expanded again.
    pub fn print_tree(&self, max_depth: Option<usize>) -> String {
        let mut output = String::new();
        let mut visited = HashSet::new();

        let top: Vec<NodeIndex> = match self.root {
            Some(root) => {
                output.push_str(&format!("{}\n", self.graph[root]));
                visited.insert(root);
                self.dependencies_of(root)
            }
            None => self.roots.clone(),
        };

        if self.root.is_some() {
            let count = top.len();
            for (i, idx) in top.iter().enumerate() {
                let is_last = i == count - 1;
                self.print_subtree(&mut output, *idx, "", is_last, 1, max_depth, &mut visited);
            }
        } else {
            for idx in top {
                output.push_str(&format!("{}\n", self.graph[idx]));
                visited.insert(idx);
                self.print_children(&mut output, idx, "", 1, max_depth, &mut visited);
                visited.remove(&idx);
            }
        }

        output
    }

    #[allow(clippy::too_many_arguments)]
    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        depth: usize,
        max_depth: Option<usize>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        let node = &self.graph[idx];
        output.push_str(&format!("{prefix}{connector}{node}\n"));

        if let Some(max) = max_depth {
            if depth >= max {
                return;
            }
        }

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        self.print_children(output, idx, &child_prefix, depth, max_depth, visited);

        visited.remove(&idx);
    }

    fn print_children(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        depth: usize,
        max_depth: Option<usize>,
        visited: &mut HashSet<NodeIndex>,
    ) {
        if max_depth.is_some_and(|max| depth >= max) {
            return;
        }
        let deps = self.dependencies_of(idx);
        let count = deps.len();
        for (i, child) in deps.iter().enumerate() {
            let is_last = i == count - 1;
            self.print_subtree(output, *child, prefix, is_last, depth + 1, max_depth, visited);
        }
    }

    /// The path from the root (or the first top-level skill that reaches it)
    /// down to `name`.
    pub fn find_path(&self, name: &str) -> Option<Vec<&SkillNode>> {
        let target = self.find(name)?;
        let starts: Vec<NodeIndex> = match self.root {
            Some(root) => vec![root],
            None => self.roots.clone(),
        };
        for start in starts {
            let mut path = Vec::new();
            let mut visited = HashSet::new();
            if self.dfs_path(start, target, &mut path, &mut visited) {
                return Some(path.iter().map(|&idx| &self.graph[idx]).collect());
            }
        }
        None
    }

    fn dfs_path(
        &self,
        current: NodeIndex,
        target: NodeIndex,
        path: &mut Vec<NodeIndex>,
        visited: &mut HashSet<NodeIndex>,
    ) -> bool {
        path.push(current);
        if current == target {
            return true;
        }
        if !visited.insert(current) {
            path.pop();
            return false;
        }
        for child in self.dependencies_of(current) {
            if self.dfs_path(child, target, path, visited) {
                return true;
            }
        }
        path.pop();
        false
    }

    /// Render everything that (transitively) depends on `name`.
    pub fn print_inverted_tree(&self, name: &str) -> String {
        let mut output = String::new();
        let Some(idx) = self.find(name) else {
            return output;
        };

        output.push_str(&format!("{}\n", self.graph[idx]));

        let mut visited = HashSet::new();
        visited.insert(idx);

        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, dep_idx) in dependents.iter().enumerate() {
            let is_last = i == count - 1;
            self.print_inverted_subtree(&mut output, *dep_idx, "", is_last, &mut visited);
        }

        output
    }

    fn print_inverted_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.graph[idx]));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let dependents = self.dependents_of(idx);
        let count = dependents.len();
        for (i, dep_idx) in dependents.iter().enumerate() {
            let is_last = i == count - 1;
            self.print_inverted_subtree(output, *dep_idx, &child_prefix, is_last, visited);
        }

        visited.remove(&idx);
    }

    /// Number of skill nodes (excluding root).
    pub fn len(&self) -> usize {
        let total = self.graph.node_count();
        if self.root.is_some() {
            total.saturating_sub(1)
        } else {
            total
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
