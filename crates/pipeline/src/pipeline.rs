//! Resolution sessions over a provider graph

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::graph::ProviderGraph;
use crate::provider::{AnyValue, Memo, Provider};
use crate::quantity::{Quantity, QuantityId};

/// One resolution session
///
/// A [Pipeline] owns a fixed set of providers, the externally supplied
/// parameters, and a memo of everything computed so far. It is built once per
/// dataset (or per segment of a dataset), queried for the quantities needed,
/// then dropped. Nothing is shared between instances.
///
/// ```rust
/// # use std::convert::Infallible;
/// # use bifrost_pipeline::{quantity, Pipeline, Provider};
/// quantity! {
///     pub Distance: f64;
///     pub Speed: f64;
///     pub Duration: f64;
/// }
///
/// let duration = Provider::new::<Duration, (Distance, Speed)>(
///     |d: &f64, v: &f64| -> Result<f64, Infallible> { Ok(d / v) },
/// );
///
/// let mut pipeline = Pipeline::from_providers([duration]).unwrap();
/// pipeline.insert::<Distance>(160.0).insert::<Speed>(800.0);
///
/// assert_eq!(*pipeline.get::<Duration>().unwrap(), 0.2);
/// ```
///
/// Each quantity is computed at most once. Asking for it again returns the
/// same shared value.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    graph: ProviderGraph,
    memo: Memo,
}

impl Pipeline {
    /// New session over an existing graph
    pub fn new(graph: ProviderGraph) -> Self {
        Self {
            graph,
            memo: Memo::default(),
        }
    }

    /// New session over a graph built from `providers`
    pub fn from_providers<I: IntoIterator<Item = Provider>>(providers: I) -> Result<Self> {
        Ok(Self::new(ProviderGraph::from_providers(providers)?))
    }

    /// Add a provider to this session's graph
    ///
    /// See [ProviderGraph::register()] for the failure cases.
    pub fn register(&mut self, provider: Provider) -> Result<&mut Self> {
        self.graph.register(provider)?;
        Ok(self)
    }

    /// Supply the value of a quantity
    ///
    /// Parameters are normally leaves. Supplying a quantity that a provider
    /// produces replaces that provider for this session, which is how
    /// previously computed results are fed back in. Anything already computed
    /// downstream of the quantity is invalidated.
    pub fn insert<Q: Quantity>(&mut self, value: Q::Value) -> &mut Self {
        let id = QuantityId::of::<Q>();
        self.store(id, Arc::new(value));
        self
    }

    /// Supply a type-erased value for the quantity `id`
    ///
    /// Fails with [Error::Unit] if the value is not of the type declared by
    /// the quantity.
    pub fn insert_dyn(&mut self, id: QuantityId, value: AnyValue) -> Result<&mut Self> {
        if (*value).type_id() != id.value_type() {
            return Err(Error::Unit {
                quantity: id.name(),
                expected: id.value_name(),
            });
        }
        self.store(id, value);
        Ok(self)
    }

    /// Resolve a quantity, computing whatever it needs
    ///
    /// Fails with [Error::UnresolvedDependency] naming the first missing leaf
    /// (in depth-first, argument order) if nothing can provide the target, or
    /// with [Error::Provider] if a provider on the way fails.
    pub fn get<Q: Quantity>(&mut self) -> Result<Arc<Q::Value>> {
        let target = QuantityId::of::<Q>();
        self.resolve(target)?;
        self.memo.fetch::<Q>()
    }

    /// Resolve a quantity by identifier, leaving the value in the memo
    pub fn resolve(&mut self, target: QuantityId) -> Result<()> {
        if self.memo.contains(&target) {
            trace!("Memo hit for {target}");
            return Ok(());
        }

        for id in self.schedule(target)? {
            // schedule only returns quantities with a provider
            let Some(provider) = self.graph.provider(&id) else {
                continue;
            };
            debug!("Computing {id}");
            let value = provider.compute(&self.memo)?;
            self.memo.set_computed(id, value);
        }

        Ok(())
    }

    /// Quantities that would be computed to resolve `Q`, in evaluation order
    ///
    /// Already available quantities are not included.
    pub fn plan<Q: Quantity>(&self) -> Result<Vec<QuantityId>> {
        self.schedule(QuantityId::of::<Q>())
    }

    /// True if the value of `Q` is available without computing anything
    pub fn is_available<Q: Quantity>(&self) -> bool {
        self.memo.contains(&QuantityId::of::<Q>())
    }

    /// Number of quantities computed so far
    pub fn n_computed(&self) -> usize {
        self.memo.n_computed()
    }

    /// The provider graph of this session
    pub fn graph(&self) -> &ProviderGraph {
        &self.graph
    }

    /// Graphviz DOT representation of the provider graph
    pub fn to_dot(&self) -> String {
        self.graph.to_dot()
    }

    /// Depth-first plan of the minimal subgraph needed for `target`
    fn schedule(&self, target: QuantityId) -> Result<Vec<QuantityId>> {
        let mut order = Vec::new();
        let mut visited = HashSet::new();
        self.visit(target, target, &mut visited, &mut order)?;
        Ok(order)
    }

    fn visit(
        &self,
        target: QuantityId,
        id: QuantityId,
        visited: &mut HashSet<QuantityId>,
        order: &mut Vec<QuantityId>,
    ) -> Result<()> {
        if self.memo.contains(&id) || !visited.insert(id) {
            return Ok(());
        }

        let provider = self
            .graph
            .provider(&id)
            .ok_or(Error::UnresolvedDependency {
                target: target.name(),
                missing: id.name(),
            })?;

        for input in provider.inputs() {
            self.visit(target, *input, visited, order)?;
        }

        order.push(id);
        Ok(())
    }

    fn store(&mut self, id: QuantityId, value: AnyValue) {
        if self.graph.remove(&id).is_some() {
            debug!("Parameter {id} replaces its provider");
        }
        self.invalidate(&id);
        self.memo.set_param(id, value);
    }

    /// Forget computed values that depend on `id`, directly or not
    fn invalidate(&mut self, id: &QuantityId) {
        let mut stack = vec![*id];
        let mut seen = HashSet::new();
        while let Some(current) = stack.pop() {
            for dependent in self.graph.dependents(&current) {
                if seen.insert(dependent) {
                    if self.memo.forget(&dependent) {
                        debug!("Invalidated {dependent} after new value for {id}");
                    }
                    stack.push(dependent);
                }
            }
        }
    }
}
