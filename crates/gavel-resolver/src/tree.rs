//! Dependency tree construction for visualization: recursive depth-first
//! expansion through the shared cache, with cycle detection and a depth
//! bound as two independent safety mechanisms.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::cache::TransitiveDependencyCache;

/// Default expansion depth: deliberately shallow to bound network fan-out.
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// A node in the expanded dependency tree. A tree, not a DAG: a coordinate
/// already seen anywhere earlier in the traversal becomes a terminal node
/// with `is_circular` set and no children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyTreeNode {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub children: Vec<DependencyTreeNode>,
    pub is_circular: bool,
}

impl DependencyTreeNode {
    /// `group:artifact:version` identifier.
    pub fn id(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }

    /// Render the tree with box-drawing connectors, one node per line.
    /// Circular nodes get a `(cycle)` badge.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("{self}\n"));
        let count = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            child.render_subtree(&mut out, "", i == count - 1);
        }
        out
    }

    fn render_subtree(&self, out: &mut String, prefix: &str, is_last: bool) {
        let connector = if is_last { "└── " } else { "├── " };
        out.push_str(&format!("{prefix}{connector}{self}\n"));
        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let count = self.children.len();
        for (i, child) in self.children.iter().enumerate() {
            child.render_subtree(out, &child_prefix, i == count - 1);
        }
    }
}

impl fmt::Display for DependencyTreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if self.is_circular {
            write!(f, " (cycle)")?;
        }
        Ok(())
    }
}

/// Expands a coordinate into a [`DependencyTreeNode`] through the shared
/// cache. The whole traversal shares one failed-repository skip-set, so a
/// dead repository costs its timeout once rather than once per node.
pub struct DependencyTreeBuilder<'a> {
    cache: &'a TransitiveDependencyCache,
    unreachable: HashSet<String>,
}

impl<'a> DependencyTreeBuilder<'a> {
    pub fn new(cache: &'a TransitiveDependencyCache) -> Self {
        Self {
            cache,
            unreachable: HashSet::new(),
        }
    }

    /// Seed the skip-set with repositories already known to be down, e.g.
    /// from a reachability check. Seeded entries are never retried during
    /// the build.
    pub fn with_unreachable(mut self, unreachable: HashSet<String>) -> Self {
        self.unreachable = unreachable;
        self
    }

    /// Build the tree rooted at a coordinate, expanding at most `max_depth`
    /// levels below the root.
    pub async fn build(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        max_depth: usize,
    ) -> DependencyTreeNode {
        let mut visited = HashSet::new();
        let mut failed = self.unreachable.clone();
        self.expand(
            group.to_string(),
            artifact.to_string(),
            version.to_string(),
            0,
            max_depth,
            &mut visited,
            &mut failed,
        )
        .await
    }

    /// Recursive step. `visited` accumulates `group:artifact:version` keys
    /// across the entire traversal — sibling subtrees included — so any
    /// revisited coordinate terminates as circular. The depth bound applies
    /// independently of visited state. `failed` is likewise traversal-wide.
    #[allow(clippy::too_many_arguments)]
    fn expand<'s>(
        &'s self,
        group: String,
        artifact: String,
        version: String,
        depth: usize,
        max_depth: usize,
        visited: &'s mut HashSet<String>,
        failed: &'s mut HashSet<String>,
    ) -> Pin<Box<dyn Future<Output = DependencyTreeNode> + Send + 's>> {
        Box::pin(async move {
            let key = format!("{group}:{artifact}:{version}");
            if !visited.insert(key) {
                return DependencyTreeNode {
                    group_id: group,
                    artifact_id: artifact,
                    version,
                    children: Vec::new(),
                    is_circular: true,
                };
            }

            let mut node = DependencyTreeNode {
                group_id: group,
                artifact_id: artifact,
                version,
                children: Vec::new(),
                is_circular: false,
            };
            if depth >= max_depth {
                return node;
            }

            let deps = self
                .cache
                .resolve_fast(&node.group_id, &node.artifact_id, &node.version, failed)
                .await;
            for dep in deps {
                if !matches!(dep.scope.as_deref(), None | Some("compile") | Some("runtime")) {
                    continue;
                }
                // A managed version is no version to recurse on.
                let Some(child_version) = dep.version else {
                    continue;
                };
                let child = self
                    .expand(
                        dep.group_id,
                        dep.artifact_id,
                        child_version,
                        depth + 1,
                        max_depth,
                        visited,
                        failed,
                    )
                    .await;
                node.children.push(child);
            }
            node
        })
    }
}
