//! The module dependency graph.
//!
//! Nodes are real paths (symlinks resolved); edges carry a type-only flag
//! and the location of the import that created them. Maps are ordered so
//! iteration -- and everything derived from it -- is deterministic.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use vibefun_common::Location;

/// One dependency edge. `type_only` is true iff every import item from
/// the target module was a `type` import.
#[derive(Debug, Clone, PartialEq)]
pub struct DependencyEdge {
    pub to: PathBuf,
    pub type_only: bool,
    pub import_loc: Location,
}

/// A directed graph of modules keyed by real path.
#[derive(Debug, Default)]
pub struct ModuleGraph {
    nodes: BTreeSet<PathBuf>,
    edges: BTreeMap<PathBuf, Vec<DependencyEdge>>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, path: PathBuf) {
        self.nodes.insert(path);
    }

    /// Record that `from` depends on `to`.
    ///
    /// Idempotent on the `(from, to)` pair: a second edge only widens the
    /// existing one -- once any edge is a value edge, the pair stays a
    /// value edge. The first import location is kept.
    pub fn add_dependency(&mut self, from: &Path, to: &Path, type_only: bool, loc: Location) {
        self.nodes.insert(from.to_path_buf());
        self.nodes.insert(to.to_path_buf());
        let edges = self.edges.entry(from.to_path_buf()).or_default();
        if let Some(existing) = edges.iter_mut().find(|e| e.to == to) {
            if !type_only {
                existing.type_only = false;
            }
            return;
        }
        edges.push(DependencyEdge {
            to: to.to_path_buf(),
            type_only,
            import_loc: loc,
        });
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.nodes.contains(path)
    }

    /// Nodes in sorted order.
    pub fn nodes(&self) -> impl Iterator<Item = &PathBuf> {
        self.nodes.iter()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges_from(&self, path: &Path) -> &[DependencyEdge] {
        self.edges.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The edge between two nodes, if any.
    pub fn edge(&self, from: &Path, to: &Path) -> Option<&DependencyEdge> {
        self.edges_from(from).iter().find(|e| e.to == to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: u32) -> Location {
        Location::new("a.vf", line, 1, 0)
    }

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn add_dependency_registers_both_nodes() {
        let mut graph = ModuleGraph::new();
        graph.add_dependency(&p("/a.vf"), &p("/b.vf"), false, loc(1));
        assert!(graph.contains(&p("/a.vf")));
        assert!(graph.contains(&p("/b.vf")));
        assert_eq!(graph.edges_from(&p("/a.vf")).len(), 1);
        assert!(graph.edges_from(&p("/b.vf")).is_empty());
    }

    #[test]
    fn duplicate_edges_collapse() {
        let mut graph = ModuleGraph::new();
        graph.add_dependency(&p("/a.vf"), &p("/b.vf"), true, loc(1));
        graph.add_dependency(&p("/a.vf"), &p("/b.vf"), true, loc(2));
        assert_eq!(graph.edges_from(&p("/a.vf")).len(), 1);
        // First import location wins.
        assert_eq!(graph.edge(&p("/a.vf"), &p("/b.vf")).unwrap().import_loc.line, 1);
    }

    #[test]
    fn value_edge_wins_over_type_only() {
        let mut graph = ModuleGraph::new();
        graph.add_dependency(&p("/a.vf"), &p("/b.vf"), true, loc(1));
        assert!(graph.edge(&p("/a.vf"), &p("/b.vf")).unwrap().type_only);

        graph.add_dependency(&p("/a.vf"), &p("/b.vf"), false, loc(2));
        assert!(!graph.edge(&p("/a.vf"), &p("/b.vf")).unwrap().type_only);

        // And it never downgrades back.
        graph.add_dependency(&p("/a.vf"), &p("/b.vf"), true, loc(3));
        assert!(!graph.edge(&p("/a.vf"), &p("/b.vf")).unwrap().type_only);
    }

    #[test]
    fn nodes_iterate_sorted() {
        let mut graph = ModuleGraph::new();
        graph.add_node(p("/c.vf"));
        graph.add_node(p("/a.vf"));
        graph.add_node(p("/b.vf"));
        let nodes: Vec<&PathBuf> = graph.nodes().collect();
        assert_eq!(nodes, vec![&p("/a.vf"), &p("/b.vf"), &p("/c.vf")]);
    }
}
