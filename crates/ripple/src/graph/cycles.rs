//! Circular import detection using petgraph.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::types::{Cycle, DependencyEdge};

/// Strongly connected components of the import graph that form a cycle.
///
/// A component counts when it has more than one file, or a single file that
/// imports itself. Files inside a cycle are sorted, and cycles are ordered by
/// their first file.
pub(super) fn find_cycles(edges: &[DependencyEdge]) -> Vec<Cycle> {
    let mut graph: DiGraph<&Path, ()> = DiGraph::new();
    let mut node_map: HashMap<&Path, NodeIndex> = HashMap::new();

    for edge in edges {
        let from = index_of(&mut graph, &mut node_map, edge.from.as_path());
        let to = index_of(&mut graph, &mut node_map, edge.to.as_path());
        graph.update_edge(from, to, ());
    }

    let mut cycles: Vec<Cycle> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|&n| graph.contains_edge(n, n))
        })
        .map(|component| {
            let mut files: Vec<PathBuf> = component
                .into_iter()
                .map(|n| graph[n].to_path_buf())
                .collect();
            files.sort();
            Cycle { files }
        })
        .collect();

    cycles.sort_by(|a, b| a.files.cmp(&b.files));
    cycles
}

fn index_of<'a>(
    graph: &mut DiGraph<&'a Path, ()>,
    node_map: &mut HashMap<&'a Path, NodeIndex>,
    path: &'a Path,
) -> NodeIndex {
    *node_map.entry(path).or_insert_with(|| graph.add_node(path))
}
