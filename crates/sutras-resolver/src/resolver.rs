//! Core dependency resolution algorithm: greedy depth-first traversal with
//! constraint propagation, cycle and conflict detection, lockfile pinning and
//! optional dependency handling.
//!
//! Each name is resolved once, to the highest version matching the first
//! constraint seen for it. Later constraints are checked against that choice
//! and never cause it to be revisited.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use sutras_core::dependency::{parse_dependencies, DependencyRequest, ROOT_SOURCE};
use sutras_core::lockfile::{LockedSkill, Lockfile};
use sutras_util::errors::{SutrasError, SutrasResult};

use crate::graph::{DependencyGraph, SkillNode};
use crate::ledger::ConstraintLedger;
use crate::path::PathStack;
use crate::provider::{LockfileProvider, RegistryProvider};
use crate::range::{parse_constraint, VersionRange};
use crate::version::{parse_version, Version};

/// Default bound on the length of a dependency chain.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Knobs for one resolver.
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Prefer versions pinned in the lockfile when they satisfy the constraint.
    pub use_lockfile: bool,
    pub max_depth: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            use_lockfile: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A skill fixed at one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedSkill {
    pub name: String,
    pub version: Version,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tarball_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    /// Every declared dependency name, in declaration order. Optional
    /// dependencies that were skipped are still listed.
    pub dependencies: Vec<String>,
}

/// The output of dependency resolution.
#[derive(Debug)]
pub struct Resolution {
    /// Resolved skills, every dependency before its dependents.
    pub skills: Vec<ResolvedSkill>,
    /// Names requested directly, in request order.
    pub roots: Vec<String>,
    /// Every constraint applied during resolution.
    pub ledger: ConstraintLedger,
}

impl Resolution {
    pub fn get(&self, name: &str) -> Option<&ResolvedSkill> {
        self.skills.iter().find(|s| s.name == name)
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Build the dependency graph, with `root` as the project node if given.
    pub fn graph(&self, root: Option<SkillNode>) -> DependencyGraph {
        build_graph(self.skills.iter().rev(), &self.roots, root)
    }

    /// Lockfile entries for every resolved skill.
    pub fn to_lockfile(&self) -> Lockfile {
        let resolved: HashSet<&str> = self.skills.iter().map(|s| s.name.as_str()).collect();
        Lockfile::generate(
            self.skills
                .iter()
                .map(|s| LockedSkill {
                    name: s.name.clone(),
                    version: s.version.to_string(),
                    registry: s.registry.clone(),
                    tarball_url: s.tarball_url.clone(),
                    checksum: s.checksum.clone(),
                    dependencies: s
                        .dependencies
                        .iter()
                        .filter(|d| resolved.contains(d.as_str()))
                        .cloned()
                        .collect(),
                })
                .collect(),
        )
    }
}

/// Resolves dependency requests against a registry, optionally honouring a
/// lockfile. A resolver holds no per-call state and can be reused.
pub struct Resolver<'a> {
    registry: &'a dyn RegistryProvider,
    lockfile: Option<&'a dyn LockfileProvider>,
    options: ResolveOptions,
}

/// Entry in the traversal work-list.
enum Frame {
    Visit(DependencyRequest),
    Leave(String),
}

/// State for a single `resolve` call.
#[derive(Default)]
struct ResolutionContext {
    ledger: ConstraintLedger,
    resolved: HashMap<String, ResolvedSkill>,
    discovery: Vec<String>,
    path: PathStack,
}

impl<'a> Resolver<'a> {
    pub fn new(registry: &'a dyn RegistryProvider) -> Self {
        Self {
            registry,
            lockfile: None,
            options: ResolveOptions::default(),
        }
    }

    pub fn with_lockfile(mut self, lockfile: &'a dyn LockfileProvider) -> Self {
        self.lockfile = Some(lockfile);
        self
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve `requests` and everything they transitively depend on.
    ///
    /// The first error encountered aborts the whole resolution.
    pub fn resolve(&self, requests: &[DependencyRequest]) -> SutrasResult<Resolution> {
        let mut ctx = ResolutionContext::default();
        let mut work: Vec<Frame> = requests
            .iter()
            .rev()
            .map(|r| {
                Frame::Visit(DependencyRequest {
                    source: ROOT_SOURCE.to_string(),
                    ..r.clone()
                })
            })
            .collect();

        while let Some(frame) = work.pop() {
            match frame {
                Frame::Visit(request) => self.visit(&mut ctx, request, &mut work)?,
                Frame::Leave(name) => {
                    let popped = ctx.path.pop();
                    debug_assert_eq!(popped.as_deref(), Some(name.as_str()));
                }
            }
        }

        let mut roots: Vec<String> = Vec::new();
        for request in requests {
            if ctx.resolved.contains_key(&request.name) && !roots.contains(&request.name) {
                roots.push(request.name.clone());
            }
        }

        let graph = build_graph(
            ctx.discovery.iter().rev().filter_map(|n| ctx.resolved.get(n)),
            &roots,
            None,
        );
        let order: Vec<String> = graph
            .install_order()?
            .into_iter()
            .map(|node| node.name.clone())
            .collect();

        let mut resolved = ctx.resolved;
        let skills: Vec<ResolvedSkill> = order
            .iter()
            .filter_map(|name| resolved.remove(name))
            .collect();

        tracing::info!("resolved {} skill(s)", skills.len());
        Ok(Resolution {
            skills,
            roots,
            ledger: ctx.ledger,
        })
    }

    fn visit(
        &self,
        ctx: &mut ResolutionContext,
        request: DependencyRequest,
        work: &mut Vec<Frame>,
    ) -> SutrasResult<()> {
        let name = request.name.as_str();
        let hint = request.registry.as_deref();

        if request.optional
            && !ctx.resolved.contains_key(name)
            && !self.registry.is_available(name, hint)?
        {
            tracing::debug!("skipping unavailable optional dependency {name}");
            return Ok(());
        }

        ctx.ledger.record(name, &request.source, &request.constraint);

        if ctx.path.contains(name) {
            return Err(SutrasError::CircularDependency {
                cycle: ctx.path.cycle_through(name),
            });
        }

        let range = parse_constraint(&request.constraint)?;

        if let Some(existing) = ctx.resolved.get(name) {
            if range.matches(&existing.version) {
                tracing::debug!(
                    "{name} {} already satisfies {range} from {}",
                    existing.version,
                    request.source
                );
                return Ok(());
            }
            return Err(SutrasError::DependencyConflict {
                name: name.to_string(),
                constraints: ctx.ledger.pairs(name),
            });
        }

        let (version, raw) = match self.pinned_version(name, &range) {
            Some(pinned) => pinned,
            None => self.select_from_registry(&request, &range)?,
        };
        tracing::debug!("resolved {name} {range} -> {version}");

        let manifest = self.registry.fetch_manifest(name, &raw, hint)?;
        let dependencies = parse_dependencies(&manifest.dependencies, name)?;

        if ctx.path.depth() >= self.options.max_depth {
            return Err(SutrasError::DepthLimitExceeded {
                name: name.to_string(),
                limit: self.options.max_depth,
            });
        }

        ctx.resolved.insert(
            name.to_string(),
            ResolvedSkill {
                name: name.to_string(),
                version,
                registry: manifest.registry.or_else(|| request.registry.clone()),
                tarball_url: manifest.tarball_url,
                checksum: manifest.checksum,
                dependencies: dependencies.iter().map(|d| d.name.clone()).collect(),
            },
        );
        ctx.discovery.push(name.to_string());
        ctx.path.push(name);

        work.push(Frame::Leave(name.to_string()));
        work.extend(dependencies.into_iter().rev().map(Frame::Visit));
        Ok(())
    }

    /// The lockfile's pin for `name`, if lockfile use is enabled and the pin
    /// satisfies `range`.
    fn pinned_version(&self, name: &str, range: &VersionRange) -> Option<(Version, String)> {
        if !self.options.use_lockfile {
            return None;
        }
        let raw = self.lockfile?.get_pinned(name)?;
        match parse_version(&raw) {
            Ok(version) if range.matches(&version) => {
                tracing::debug!("using locked {name} {version}");
                Some((version, raw))
            }
            Ok(version) => {
                tracing::debug!("locked {name} {version} does not satisfy {range}");
                None
            }
            Err(_) => {
                tracing::warn!("ignoring unparseable locked version '{raw}' for {name}");
                None
            }
        }
    }

    fn select_from_registry(
        &self,
        request: &DependencyRequest,
        range: &VersionRange,
    ) -> SutrasResult<(Version, String)> {
        let name = request.name.as_str();
        let not_found = || SutrasError::SkillNotFound {
            name: name.to_string(),
            constraint: Some(request.constraint.clone()),
        };

        let listed = match self.registry.list_versions(name, request.registry.as_deref()) {
            Ok(listed) => listed,
            Err(SutrasError::SkillNotFound { .. }) => return Err(not_found()),
            Err(e) => return Err(e),
        };
        if listed.is_empty() {
            return Err(not_found());
        }

        let mut candidates: Vec<(Version, String)> = listed
            .into_iter()
            .filter_map(|raw| match parse_version(&raw) {
                Ok(v) => Some((v, raw)),
                Err(_) => {
                    tracing::warn!("ignoring unparseable version '{raw}' of {name}");
                    None
                }
            })
            .collect();
        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        let Some(best) = range.select_highest(candidates.iter().map(|(v, _)| v)) else {
            return Err(SutrasError::NoMatchingVersion {
                name: name.to_string(),
                constraint: request.constraint.clone(),
                available: candidates.iter().map(|(v, _)| v.to_string()).collect(),
            });
        };
        let raw = candidates
            .into_iter()
            .find(|(v, _)| *v == best)
            .map(|(_, raw)| raw)
            .unwrap_or_else(|| best.to_string());
        Ok((best, raw))
    }
}

/// Build a graph from resolved skills. Edges to names that were never
/// resolved (skipped optional dependencies) are dropped.
///
/// Nodes are inserted in the order given; with reverse discovery order the
/// graph's install order matches the traversal's post-order.
fn build_graph<'s>(
    skills: impl Iterator<Item = &'s ResolvedSkill>,
    roots: &[String],
    root: Option<SkillNode>,
) -> DependencyGraph {
    let mut graph = DependencyGraph::new();
    if let Some(root) = root {
        let idx = graph.add_node(root);
        graph.set_root(idx);
    }
    let skills: Vec<&ResolvedSkill> = skills.collect();
    for skill in &skills {
        graph.add_node(SkillNode::new(&skill.name, skill.version.to_string()));
    }
    for name in roots {
        if let Some(idx) = graph.find(name) {
            graph.add_top_level(idx);
        }
    }
    for skill in &skills {
        let Some(from) = graph.find(&skill.name) else {
            continue;
        };
        for dep in &skill.dependencies {
            if let Some(to) = graph.find(dep) {
                graph.add_edge(from, to);
            }
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(name: &str, version: &str, deps: &[&str]) -> ResolvedSkill {
        ResolvedSkill {
            name: name.to_string(),
            version: parse_version(version).unwrap(),
            registry: None,
            tarball_url: None,
            checksum: None,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
        }
    }

    #[test]
    fn default_options() {
        let opts = ResolveOptions::default();
        assert!(opts.use_lockfile);
        assert_eq!(opts.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn lockfile_drops_unresolved_dependencies() {
        let resolution = Resolution {
            skills: vec![
                skill("@u/b", "1.0.0", &[]),
                skill("@u/a", "2.0.0", &["@u/b", "@u/skipped"]),
            ],
            roots: vec!["@u/a".to_string()],
            ledger: ConstraintLedger::new(),
        };
        let lockfile = resolution.to_lockfile();
        assert_eq!(lockfile.skill[0].name, "@u/a");
        assert_eq!(lockfile.skill[0].version, "2.0.0");
        assert_eq!(lockfile.skill[0].dependencies, vec!["@u/b"]);
    }

    #[test]
    fn graph_with_project_root() {
        let resolution = Resolution {
            skills: vec![skill("@u/b", "1.0.0", &[]), skill("@u/a", "2.0.0", &["@u/b"])],
            roots: vec!["@u/a".to_string()],
            ledger: ConstraintLedger::new(),
        };
        let graph = resolution.graph(Some(SkillNode::new("@acme/app", "0.1.0")));
        assert_eq!(graph.len(), 2);
        let tree = graph.print_tree(None);
        assert!(tree.starts_with("@acme/app v0.1.0\n"));
        assert!(tree.contains("└── @u/a v2.0.0"));
        assert!(tree.contains("    └── @u/b v1.0.0"));
    }

    #[test]
    fn resolved_skill_serializes_version_as_string() {
        let json = serde_json::to_value(skill("@u/a", "1.2.0", &["@u/b"])).unwrap();
        assert_eq!(json["version"], "1.2.0");
        assert_eq!(json["dependencies"][0], "@u/b");
        assert!(json.get("checksum").is_none());
    }
}
