//! Registry of providers and the dependency graph between quantities

use std::collections::HashMap;

use log::trace;
use petgraph::algo::toposort;
use petgraph::dot::{Config, Dot};
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;

use crate::error::{GraphError, Result};
use crate::provider::Provider;
use crate::quantity::QuantityId;

/// Set of providers forming a directed acyclic graph
///
/// Nodes are quantities, edges run from each input to the output of the
/// provider that consumes it. Edge weights are the argument position.
///
/// Both invariants are enforced on [ProviderGraph::register()]:
///
/// - every quantity has at most one producing provider
/// - the graph stays acyclic
///
/// Cloning is cheap as provider functions are shared, so one graph can seed
/// many independent [Pipeline](crate::Pipeline) instances.
#[derive(Debug, Clone, Default)]
pub struct ProviderGraph {
    graph: DiGraphMap<QuantityId, usize>,
    providers: HashMap<QuantityId, Provider>,
}

impl ProviderGraph {
    /// Empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from a collection of providers
    pub fn from_providers<I: IntoIterator<Item = Provider>>(providers: I) -> Result<Self> {
        let mut graph = Self::new();
        for provider in providers {
            graph.register(provider)?;
        }
        Ok(graph)
    }

    /// Add a provider to the graph
    ///
    /// Fails with [GraphError::DuplicateProducer] if the output already has a
    /// provider, or [GraphError::Cycle] if the new edges would close a cycle.
    /// On failure the graph is left unchanged.
    pub fn register(&mut self, provider: Provider) -> Result<()> {
        let output = provider.output();

        if self.providers.contains_key(&output) {
            return Err(GraphError::DuplicateProducer {
                quantity: output.name(),
            }
            .into());
        }

        // remember what is new so a rejected provider leaves no trace
        let mut new_nodes: Vec<QuantityId> = std::iter::once(&output)
            .chain(provider.inputs())
            .filter(|id| !self.graph.contains_node(**id))
            .copied()
            .collect();
        new_nodes.sort();
        new_nodes.dedup();

        self.graph.add_node(output);
        let mut added = Vec::with_capacity(provider.inputs().len());
        for (position, input) in provider.inputs().iter().enumerate() {
            if self.graph.add_edge(*input, output, position).is_none() {
                added.push(*input);
            }
        }

        if let Err(cycle) = toposort(&self.graph, None) {
            let through = cycle.node_id();
            for input in added {
                self.graph.remove_edge(input, output);
            }
            for node in new_nodes {
                self.graph.remove_node(node);
            }
            return Err(GraphError::Cycle {
                quantity: output.name(),
                through: through.name(),
            }
            .into());
        }

        trace!(
            "Registered provider {} <- {:?}",
            output,
            provider.inputs().iter().map(|i| i.name()).collect::<Vec<_>>()
        );
        self.providers.insert(output, provider);
        Ok(())
    }

    /// Remove the provider of a quantity, if any
    ///
    /// The quantity stays in the graph as a leaf and edges to its dependents
    /// are kept.
    pub fn remove(&mut self, id: &QuantityId) -> Option<Provider> {
        let provider = self.providers.remove(id)?;
        let inputs: Vec<_> = self
            .graph
            .neighbors_directed(*id, Direction::Incoming)
            .collect();
        for input in inputs {
            self.graph.remove_edge(input, *id);
        }
        Some(provider)
    }

    /// Provider producing `id`, if registered
    pub fn provider(&self, id: &QuantityId) -> Option<&Provider> {
        self.providers.get(id)
    }

    /// True if some provider produces `id`
    pub fn produces(&self, id: &QuantityId) -> bool {
        self.providers.contains_key(id)
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// True if no providers are registered
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Quantities that consume `id` directly
    pub fn dependents(&self, id: &QuantityId) -> Vec<QuantityId> {
        if !self.graph.contains_node(*id) {
            return Vec::new();
        }
        self.graph
            .neighbors_directed(*id, Direction::Outgoing)
            .collect()
    }

    /// Quantities with no provider that something depends on
    ///
    /// These are the parameters a pipeline must be given to resolve every
    /// registered quantity.
    pub fn leaves(&self) -> Vec<QuantityId> {
        let mut leaves: Vec<_> = self
            .graph
            .nodes()
            .filter(|id| !self.providers.contains_key(id))
            .collect();
        leaves.sort();
        leaves
    }

    /// Graphviz DOT representation of the dependency graph
    pub fn to_dot(&self) -> String {
        format!("{}", Dot::with_config(&self.graph, &[Config::EdgeNoLabel]))
    }
}
