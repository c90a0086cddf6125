//! Dependency graph of the components of a collection.
//!
//! Components are created in dependency order: a component comes after every
//! component it depends on. Among components whose dependencies are satisfied, the
//! one declared first in the collection goes first, so the order is stable across
//! runs and unrelated components keep their declaration order.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::core::WorkloadError;

/// Color states for cycle detection using DFS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    /// Node has not been visited.
    White,
    /// Node is on the current DFS path.
    Gray,
    /// Node and everything reachable from it has been visited.
    Black,
}

/// Directed graph over component declaration indices.
///
/// An edge `a → b` means component `a` depends on component `b`. Node indices equal
/// declaration indices.
#[derive(Debug)]
pub struct ComponentGraph {
    graph: DiGraph<String, ()>,
}

impl ComponentGraph {
    /// Build the graph from component names and their declared dependencies.
    ///
    /// `dependencies[i]` lists the names component `i` depends on. A name that is not
    /// a component fails with [`WorkloadError::UnknownDependency`].
    pub fn new(names: &[String], dependencies: &[Vec<String>]) -> Result<Self, WorkloadError> {
        let mut graph = DiGraph::with_capacity(names.len(), 0);
        let mut index: HashMap<&str, NodeIndex> = HashMap::new();

        for name in names {
            let node = graph.add_node(name.clone());
            index.entry(name.as_str()).or_insert(node);
        }

        for (from, deps) in dependencies.iter().enumerate() {
            let from_idx = NodeIndex::new(from);
            for dependency in deps {
                let Some(&to_idx) = index.get(dependency.as_str()) else {
                    return Err(WorkloadError::UnknownDependency {
                        component: names[from].clone(),
                        dependency: dependency.clone(),
                        available: names.to_vec(),
                    });
                };

                if !graph.contains_edge(from_idx, to_idx) {
                    graph.add_edge(from_idx, to_idx, ());
                }
            }
        }

        Ok(Self { graph })
    }

    /// Detect cycles, including self-dependencies, with an iterative DFS.
    ///
    /// The reported chain starts and ends with the same component.
    pub fn detect_cycles(&self) -> Result<(), WorkloadError> {
        let mut colors = vec![Color::White; self.graph.node_count()];

        for start in self.graph.node_indices() {
            if colors[start.index()] != Color::White {
                continue;
            }

            // Each frame is a node and the position of its next neighbor to visit
            let mut stack: Vec<(NodeIndex, usize)> = vec![(start, 0)];
            colors[start.index()] = Color::Gray;

            while let Some(frame) = stack.last_mut() {
                let (node, position) = *frame;
                frame.1 += 1;

                let neighbors = self.sorted_neighbors(node, Direction::Outgoing);
                let Some(&neighbor) = neighbors.get(position) else {
                    colors[node.index()] = Color::Black;
                    stack.pop();
                    continue;
                };

                match colors[neighbor.index()] {
                    Color::Gray => {
                        let cycle_start = stack.iter().position(|(n, _)| *n == neighbor).unwrap_or(0);
                        let mut chain: Vec<String> =
                            stack[cycle_start..].iter().map(|(n, _)| self.graph[*n].clone()).collect();
                        chain.push(self.graph[neighbor].clone());
                        return Err(WorkloadError::DependencyCycle { chain });
                    }
                    Color::White => {
                        colors[neighbor.index()] = Color::Gray;
                        stack.push((neighbor, 0));
                    }
                    Color::Black => {}
                }
            }
        }

        Ok(())
    }

    /// Declaration indices in creation order.
    ///
    /// Kahn's algorithm, always taking the ready component with the smallest
    /// declaration index.
    pub fn order(&self) -> Result<Vec<usize>, WorkloadError> {
        self.detect_cycles()?;

        let mut remaining: Vec<usize> = self
            .graph
            .node_indices()
            .map(|node| self.graph.neighbors_directed(node, Direction::Outgoing).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = remaining
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(remaining.len());
        while let Some(Reverse(i)) = ready.pop() {
            order.push(i);
            for dependent in self.graph.neighbors_directed(NodeIndex::new(i), Direction::Incoming) {
                let count = &mut remaining[dependent.index()];
                *count -= 1;
                if *count == 0 {
                    ready.push(Reverse(dependent.index()));
                }
            }
        }

        if order.len() < remaining.len() {
            // Unreachable after detect_cycles; report the blocked components
            let chain = remaining
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(|(i, _)| self.graph[NodeIndex::new(i)].clone())
                .collect();
            return Err(WorkloadError::DependencyCycle { chain });
        }

        Ok(order)
    }

    /// Neighbors in declaration order; petgraph yields them newest edge first.
    fn sorted_neighbors(&self, node: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(node, direction).collect();
        neighbors.sort();
        neighbors
    }

    /// Number of components.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether the graph has no components.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(components: &[(&str, &[&str])]) -> Result<ComponentGraph, WorkloadError> {
        let names: Vec<String> = components.iter().map(|(name, _)| (*name).to_string()).collect();
        let deps: Vec<Vec<String>> = components
            .iter()
            .map(|(_, deps)| deps.iter().map(|d| (*d).to_string()).collect())
            .collect();
        ComponentGraph::new(&names, &deps)
    }

    #[test]
    fn test_simple_dependency_chain() {
        let graph = graph(&[("A", &["B"]), ("B", &["C"]), ("C", &[])]).unwrap();
        assert_eq!(graph.order().unwrap(), vec![2, 1, 0]);
    }

    #[test]
    fn test_independent_components_keep_declaration_order() {
        let graph = graph(&[("web", &[]), ("cache", &[]), ("db", &[])]).unwrap();
        assert_eq!(graph.order().unwrap(), vec![0, 1, 2]);
        assert!(graph.edge_count() == 0);
    }

    #[test]
    fn test_smallest_ready_index_goes_first() {
        // db has no dependencies but is declared last
        let graph = graph(&[("web", &["db"]), ("worker", &[]), ("db", &[])]).unwrap();
        assert_eq!(graph.order().unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn test_diamond() {
        let graph = graph(&[("app", &["api", "ui"]), ("api", &["db"]), ("ui", &["db"]), ("db", &[])]).unwrap();
        assert_eq!(graph.order().unwrap(), vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_two_node_cycle() {
        let graph = graph(&[("A", &["B"]), ("B", &["A"])]).unwrap();
        let error = graph.order().unwrap_err();
        assert_eq!(
            error,
            WorkloadError::DependencyCycle {
                chain: vec!["A".to_string(), "B".to_string(), "A".to_string()],
            }
        );
        assert!(error.to_string().contains("A → B → A"));
    }

    #[test]
    fn test_self_dependency() {
        let graph = graph(&[("A", &[]), ("B", &["B"])]).unwrap();
        let error = graph.detect_cycles().unwrap_err();
        assert_eq!(error.to_string(), "circular component dependency detected: B → B");
    }

    #[test]
    fn test_cycle_behind_acyclic_prefix() {
        let graph = graph(&[("A", &["B"]), ("B", &["C"]), ("C", &["D"]), ("D", &["B"])]).unwrap();
        match graph.detect_cycles().unwrap_err() {
            WorkloadError::DependencyCycle { chain } => {
                assert_eq!(chain, vec!["B", "C", "D", "B"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_dependency() {
        let error = graph(&[("web", &["databse"]), ("database", &[])]).unwrap_err();
        assert_eq!(
            error,
            WorkloadError::UnknownDependency {
                component: "web".to_string(),
                dependency: "databse".to_string(),
                available: vec!["web".to_string(), "database".to_string()],
            }
        );
    }

    #[test]
    fn test_duplicate_dependency_entries() {
        let graph = graph(&[("web", &["db", "db"]), ("db", &[])]).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.order().unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_empty_graph() {
        let graph = graph(&[]).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert!(graph.order().unwrap().is_empty());
    }
}
