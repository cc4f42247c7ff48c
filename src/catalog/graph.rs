//! Prerequisite graph.
//!
//! Provides the `RequirementGraph` type, which represents the `requires`
//! relationships of a catalog as a directed graph. Used by the integrity
//! checker to find prerequisite cycles and properties whose prerequisites
//! contradict their exclusions.

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::ids::PropertyId;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Bfs, Reversed};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// A directed graph of property prerequisites.
///
/// If property A requires B, the graph holds an edge B -> A: B has to be
/// present for A to be legal.
///
/// # Examples
///
/// ```rust
/// use gearforge::catalog::graph::RequirementGraph;
/// use gearforge::PropertyId;
///
/// let mut graph = RequirementGraph::new();
/// let balanced = PropertyId::new("balanced");
/// let keen = PropertyId::new("keen");
///
/// // keen requires balanced
/// graph.add_requirement(keen.clone(), balanced.clone());
///
/// let order = graph.topological_order().unwrap();
/// let b = order.iter().position(|p| p == &balanced).unwrap();
/// let k = order.iter().position(|p| p == &keen).unwrap();
/// assert!(b < k);
/// ```
#[derive(Debug, Default)]
pub struct RequirementGraph {
    graph: DiGraph<PropertyId, ()>,
    node_map: HashMap<PropertyId, NodeIndex>,
}

impl RequirementGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph for every property in a catalog, in catalog order.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut graph = Self::new();
        for property in catalog.properties() {
            graph.add_node(property.id.clone());
        }
        for property in catalog.properties() {
            for prerequisite in &property.requires {
                graph.add_requirement(property.id.clone(), prerequisite.clone());
            }
        }
        graph
    }

    /// Add a node if it doesn't exist and return its index.
    pub fn add_node(&mut self, id: PropertyId) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&id) {
            idx
        } else {
            let idx = self.graph.add_node(id.clone());
            self.node_map.insert(id, idx);
            idx
        }
    }

    /// Record that `dependent` requires `prerequisite`.
    pub fn add_requirement(&mut self, dependent: PropertyId, prerequisite: PropertyId) {
        let dependent_idx = self.add_node(dependent);
        let prerequisite_idx = self.add_node(prerequisite);
        self.graph.add_edge(prerequisite_idx, dependent_idx, ());
    }

    pub fn contains(&self, id: &PropertyId) -> bool {
        self.node_map.contains_key(id)
    }

    /// Detect prerequisite cycles.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if no cycles are detected
    /// * `Err(CatalogError::PrerequisiteCycle)` with the cycle path otherwise
    ///
    /// # Examples
    ///
    /// ```rust
    /// use gearforge::catalog::graph::RequirementGraph;
    /// use gearforge::PropertyId;
    ///
    /// let mut graph = RequirementGraph::new();
    /// let a = PropertyId::new("A");
    /// let b = PropertyId::new("B");
    ///
    /// graph.add_requirement(b.clone(), a.clone());
    /// assert!(graph.detect_cycles().is_ok());
    ///
    /// graph.add_requirement(a.clone(), b.clone());
    /// assert!(graph.detect_cycles().is_err());
    /// ```
    pub fn detect_cycles(&self) -> Result<(), CatalogError> {
        let mut visited = HashSet::new();
        let mut rec_stack = HashSet::new();

        for node_idx in self.graph.node_indices() {
            if !visited.contains(&node_idx) {
                let mut path = Vec::new();
                if let Some(cycle) =
                    self.dfs_cycle_detect(node_idx, &mut visited, &mut rec_stack, &mut path)
                {
                    return Err(cycle);
                }
            }
        }

        Ok(())
    }

    fn dfs_cycle_detect(
        &self,
        node: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        rec_stack: &mut HashSet<NodeIndex>,
        path: &mut Vec<PropertyId>,
    ) -> Option<CatalogError> {
        visited.insert(node);
        rec_stack.insert(node);
        path.push(self.graph[node].clone());

        for neighbor in self.graph.neighbors_directed(node, Direction::Outgoing) {
            if !visited.contains(&neighbor) {
                if let Some(cycle) = self.dfs_cycle_detect(neighbor, visited, rec_stack, path) {
                    return Some(cycle);
                }
            } else if rec_stack.contains(&neighbor) {
                let neighbor_id = self.graph[neighbor].clone();
                let start = path.iter().position(|id| id == &neighbor_id).unwrap_or(0);
                let mut cycle: Vec<PropertyId> = path[start..].to_vec();
                cycle.push(neighbor_id);
                return Some(CatalogError::PrerequisiteCycle { path: cycle });
            }
        }

        rec_stack.remove(&node);
        path.pop();
        None
    }

    /// All properties, prerequisites before their dependents.
    pub fn topological_order(&self) -> Result<Vec<PropertyId>, CatalogError> {
        self.detect_cycles()?;

        match toposort(&self.graph, None) {
            Ok(indices) => Ok(indices
                .into_iter()
                .map(|idx| self.graph[idx].clone())
                .collect()),
            Err(cycle) => Err(CatalogError::PrerequisiteCycle {
                path: vec![self.graph[cycle.node_id()].clone()],
            }),
        }
    }

    /// Every property `id` transitively requires, not including `id` itself.
    ///
    /// Returns an empty set for an unknown id.
    pub fn prerequisite_closure(&self, id: &PropertyId) -> HashSet<PropertyId> {
        let mut closure = HashSet::new();
        let Some(&start) = self.node_map.get(id) else {
            return closure;
        };

        let reversed = Reversed(&self.graph);
        let mut bfs = Bfs::new(reversed, start);
        while let Some(idx) = bfs.next(reversed) {
            if idx != start {
                closure.insert(self.graph[idx].clone());
            }
        }
        closure
    }
}
