//! Operation: display the dependency tree.

use std::path::Path;

use sutras_core::config::GlobalConfig;
use sutras_resolver::graph::DependencyGraph;

use crate::ops_resolve::resolve_project;

/// Options for `sutras tree`.
#[derive(Debug, Default)]
pub struct TreeOptions {
    /// Maximum tree depth to display.
    pub depth: Option<usize>,
    /// Show the path from the project to this skill.
    pub why: Option<String>,
    /// Show everything that depends on this skill.
    pub inverted: Option<String>,
}

/// Render the view of `graph` selected by `opts`.
pub fn render(graph: &DependencyGraph, opts: &TreeOptions) -> String {
    if let Some(target) = &opts.why {
        return match graph.find_path(target) {
            Some(path) => {
                let mut output = format!("Path to {target}:\n");
                for (i, node) in path.iter().enumerate() {
                    output.push_str(&format!("{}{node}\n", "  ".repeat(i)));
                }
                output
            }
            None => format!("Skill '{target}' not found in the graph.\n"),
        };
    }

    if let Some(target) = &opts.inverted {
        let inverted = graph.print_inverted_tree(target);
        return if inverted.is_empty() {
            format!("Skill '{target}' not found in the graph.\n")
        } else {
            inverted
        };
    }

    graph.print_tree(opts.depth)
}

/// Display the dependency tree for the project.
pub fn tree(project_root: &Path, config: &GlobalConfig, opts: &TreeOptions) -> miette::Result<()> {
    let project = resolve_project(project_root, config, true)?;
    print!("{}", render(&project.graph(), opts));
    Ok(())
}
