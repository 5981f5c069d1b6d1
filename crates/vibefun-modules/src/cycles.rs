//! Cycle detection and compilation ordering via Tarjan's algorithm.
//!
//! One DFS computes the strongly-connected components, classifies them
//! (self-import, value cycle, type-only cycle), and yields the
//! compilation order: Tarjan emits each SCC only after every SCC it
//! depends on, so the emission order is already dependencies-first.
//! DFS roots and SCC members are visited in sorted path order, making
//! both the order and the reported cycle paths deterministic.

use std::path::PathBuf;

use vibefun_common::Location;

use crate::graph::ModuleGraph;

/// A dependency cycle of two or more modules.
#[derive(Debug, Clone, PartialEq)]
pub struct Cycle {
    /// Members sorted by absolute real path.
    pub path: Vec<PathBuf>,
    /// True iff every edge among the members is type-only; such cycles
    /// are safe and produce no warning.
    pub all_type_only: bool,
    /// Locations of the imports forming the cycle.
    pub locations: Vec<Location>,
}

/// A module that imports itself. Always an error.
#[derive(Debug, Clone, PartialEq)]
pub struct SelfImport {
    pub path: PathBuf,
    pub loc: Location,
}

/// Result of analyzing the graph.
#[derive(Debug, Default)]
pub struct GraphAnalysis {
    /// Every node, dependencies before dependents, ties broken by path.
    pub order: Vec<PathBuf>,
    pub cycles: Vec<Cycle>,
    pub self_imports: Vec<SelfImport>,
}

struct Tarjan<'g> {
    graph: &'g ModuleGraph,
    nodes: Vec<PathBuf>,
    adjacency: Vec<Vec<usize>>,
    index: Vec<Option<u32>>,
    lowlink: Vec<u32>,
    on_stack: Vec<bool>,
    stack: Vec<usize>,
    next_index: u32,
    sccs: Vec<Vec<usize>>,
}

/// Run Tarjan over the graph and classify every SCC.
pub fn analyze(graph: &ModuleGraph) -> GraphAnalysis {
    let nodes: Vec<PathBuf> = graph.nodes().cloned().collect();
    let index_of: std::collections::BTreeMap<PathBuf, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, p)| (p.clone(), i))
        .collect();
    let adjacency: Vec<Vec<usize>> = nodes
        .iter()
        .map(|node| {
            graph
                .edges_from(node)
                .iter()
                .filter_map(|e| index_of.get(&e.to).copied())
                .collect()
        })
        .collect();
    let count = nodes.len();
    let mut tarjan = Tarjan {
        graph,
        nodes,
        adjacency,
        index: vec![None; count],
        lowlink: vec![0; count],
        on_stack: vec![false; count],
        stack: Vec::new(),
        next_index: 0,
        sccs: Vec::new(),
    };

    for v in 0..count {
        if tarjan.index[v].is_none() {
            tarjan.visit(v);
        }
    }

    tarjan.into_analysis()
}

impl Tarjan<'_> {
    fn visit(&mut self, v: usize) {
        self.index[v] = Some(self.next_index);
        self.lowlink[v] = self.next_index;
        self.next_index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;

        for i in 0..self.adjacency[v].len() {
            let w = self.adjacency[v][i];
            if self.index[w].is_none() {
                self.visit(w);
                self.lowlink[v] = self.lowlink[v].min(self.lowlink[w]);
            } else if self.on_stack[w] {
                self.lowlink[v] = self.lowlink[v].min(self.index[w].unwrap());
            }
        }

        if Some(self.lowlink[v]) == self.index[v] {
            let mut scc = Vec::new();
            loop {
                let w = self.stack.pop().expect("stack holds the SCC");
                self.on_stack[w] = false;
                scc.push(w);
                if w == v {
                    break;
                }
            }
            self.sccs.push(scc);
        }
    }

    fn into_analysis(self) -> GraphAnalysis {
        let mut analysis = GraphAnalysis::default();

        // Tarjan pops an SCC only after everything reachable from it, so
        // `sccs` is already in dependencies-first order.
        for scc in &self.sccs {
            let mut members: Vec<PathBuf> =
                scc.iter().map(|&i| self.nodes[i].clone()).collect();
            members.sort();
            analysis.order.extend(members.iter().cloned());

            if scc.len() == 1 {
                let node = &members[0];
                if let Some(edge) = self.graph.edge(node, node) {
                    analysis.self_imports.push(SelfImport {
                        path: node.clone(),
                        loc: edge.import_loc.clone(),
                    });
                }
                continue;
            }

            let member_set: std::collections::BTreeSet<&PathBuf> = members.iter().collect();
            let mut all_type_only = true;
            let mut locations = Vec::new();
            for member in &members {
                for edge in self.graph.edges_from(member) {
                    if member_set.contains(&edge.to) {
                        if !edge.type_only {
                            all_type_only = false;
                        }
                        locations.push(edge.import_loc.clone());
                    }
                }
            }
            analysis.cycles.push(Cycle {
                path: members,
                all_type_only,
                locations,
            });
        }

        analysis
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: u32) -> Location {
        Location::new("test.vf", line, 1, 0)
    }

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn linear_chain_orders_dependencies_first() {
        // a -> b -> c: c compiles first, a last.
        let mut graph = ModuleGraph::new();
        graph.add_dependency(&p("/a.vf"), &p("/b.vf"), false, loc(1));
        graph.add_dependency(&p("/b.vf"), &p("/c.vf"), false, loc(1));

        let analysis = analyze(&graph);
        assert_eq!(analysis.order, vec![p("/c.vf"), p("/b.vf"), p("/a.vf")]);
        assert!(analysis.cycles.is_empty());
        assert!(analysis.self_imports.is_empty());
    }

    #[test]
    fn independent_nodes_sort_alphabetically() {
        let mut graph = ModuleGraph::new();
        graph.add_node(p("/c.vf"));
        graph.add_node(p("/a.vf"));
        graph.add_node(p("/b.vf"));

        let analysis = analyze(&graph);
        assert_eq!(analysis.order, vec![p("/a.vf"), p("/b.vf"), p("/c.vf")]);
    }

    #[test]
    fn diamond_keeps_shared_dependency_first() {
        // a -> {b, c}, b -> d, c -> d.
        let mut graph = ModuleGraph::new();
        graph.add_dependency(&p("/a.vf"), &p("/b.vf"), false, loc(1));
        graph.add_dependency(&p("/a.vf"), &p("/c.vf"), false, loc(2));
        graph.add_dependency(&p("/b.vf"), &p("/d.vf"), false, loc(1));
        graph.add_dependency(&p("/c.vf"), &p("/d.vf"), false, loc(1));

        let analysis = analyze(&graph);
        let pos = |path: &str| {
            analysis
                .order
                .iter()
                .position(|x| x == &p(path))
                .unwrap()
        };
        assert!(pos("/d.vf") < pos("/b.vf"));
        assert!(pos("/d.vf") < pos("/c.vf"));
        assert!(pos("/b.vf") < pos("/a.vf"));
        assert!(pos("/c.vf") < pos("/a.vf"));
    }

    #[test]
    fn three_cycle_is_one_scc_with_sorted_path() {
        // a -> b -> c -> a, plus entry from a; members alphabetized.
        let mut graph = ModuleGraph::new();
        graph.add_dependency(&p("/c.vf"), &p("/a.vf"), false, loc(3));
        graph.add_dependency(&p("/a.vf"), &p("/b.vf"), false, loc(1));
        graph.add_dependency(&p("/b.vf"), &p("/c.vf"), false, loc(2));

        let analysis = analyze(&graph);
        assert_eq!(analysis.cycles.len(), 1);
        let cycle = &analysis.cycles[0];
        assert_eq!(cycle.path, vec![p("/a.vf"), p("/b.vf"), p("/c.vf")]);
        assert!(!cycle.all_type_only);
        assert_eq!(cycle.locations.len(), 3);
        // Cycle members still appear in the compilation order.
        assert_eq!(analysis.order.len(), 3);
        assert!(analysis.self_imports.is_empty());
    }

    #[test]
    fn type_only_cycle_is_safe() {
        let mut graph = ModuleGraph::new();
        graph.add_dependency(&p("/a.vf"), &p("/b.vf"), true, loc(1));
        graph.add_dependency(&p("/b.vf"), &p("/a.vf"), true, loc(1));

        let analysis = analyze(&graph);
        assert_eq!(analysis.cycles.len(), 1);
        assert!(analysis.cycles[0].all_type_only);
    }

    #[test]
    fn mixed_cycle_is_not_type_only() {
        let mut graph = ModuleGraph::new();
        graph.add_dependency(&p("/a.vf"), &p("/b.vf"), true, loc(1));
        graph.add_dependency(&p("/b.vf"), &p("/a.vf"), false, loc(1));

        let analysis = analyze(&graph);
        assert_eq!(analysis.cycles.len(), 1);
        assert!(!analysis.cycles[0].all_type_only);
    }

    #[test]
    fn self_import_is_not_a_cycle() {
        let mut graph = ModuleGraph::new();
        graph.add_dependency(&p("/a.vf"), &p("/a.vf"), false, loc(7));

        let analysis = analyze(&graph);
        assert!(analysis.cycles.is_empty());
        assert_eq!(analysis.self_imports.len(), 1);
        assert_eq!(analysis.self_imports[0].path, p("/a.vf"));
        assert_eq!(analysis.self_imports[0].loc.line, 7);
    }

    #[test]
    fn every_node_lands_in_exactly_one_scc() {
        let mut graph = ModuleGraph::new();
        graph.add_dependency(&p("/a.vf"), &p("/b.vf"), false, loc(1));
        graph.add_dependency(&p("/b.vf"), &p("/a.vf"), false, loc(1));
        graph.add_dependency(&p("/a.vf"), &p("/c.vf"), false, loc(2));
        graph.add_node(p("/d.vf"));

        let analysis = analyze(&graph);
        let mut all: Vec<&PathBuf> = analysis.order.iter().collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 4, "each node appears exactly once");
    }

    #[test]
    fn analysis_is_deterministic() {
        let build = || {
            let mut graph = ModuleGraph::new();
            graph.add_dependency(&p("/m1.vf"), &p("/m2.vf"), false, loc(1));
            graph.add_dependency(&p("/m2.vf"), &p("/m3.vf"), false, loc(1));
            graph.add_dependency(&p("/m3.vf"), &p("/m1.vf"), false, loc(1));
            graph.add_dependency(&p("/m1.vf"), &p("/zz.vf"), false, loc(2));
            analyze(&graph)
        };
        let first = build();
        let second = build();
        assert_eq!(first.order, second.order);
        assert_eq!(first.cycles, second.cycles);
    }
}
