//! Providers: pure functions producing one quantity from others

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{BoxError, Error, Result};
use crate::quantity::{Quantity, QuantityId};

/// Type-erased, shareable quantity value
pub type AnyValue = Arc<dyn Any + Send + Sync>;

type ComputeFn = dyn Fn(&Memo) -> Result<AnyValue> + Send + Sync;

/// Values available to providers during one resolution session
///
/// Holds the externally supplied parameters and everything computed so far.
/// Parameters are kept apart from computed values so that invalidating
/// downstream results never discards user input.
#[derive(Clone, Default)]
pub struct Memo {
    params: HashMap<QuantityId, AnyValue>,
    computed: HashMap<QuantityId, AnyValue>,
}

impl Memo {
    /// Typed access to an available value
    pub fn fetch<Q: Quantity>(&self) -> Result<Arc<Q::Value>> {
        let id = QuantityId::of::<Q>();
        let value = self.lookup(&id).ok_or(Error::UnresolvedDependency {
            target: id.name(),
            missing: id.name(),
        })?;

        Arc::clone(value)
            .downcast::<Q::Value>()
            .map_err(|_| Error::Unit {
                quantity: id.name(),
                expected: id.value_name(),
            })
    }

    /// True if the quantity is a parameter or has been computed
    pub fn contains(&self, id: &QuantityId) -> bool {
        self.params.contains_key(id) || self.computed.contains_key(id)
    }

    /// True if the quantity was supplied as a parameter
    pub fn is_param(&self, id: &QuantityId) -> bool {
        self.params.contains_key(id)
    }

    pub(crate) fn lookup(&self, id: &QuantityId) -> Option<&AnyValue> {
        self.params.get(id).or_else(|| self.computed.get(id))
    }

    pub(crate) fn set_param(&mut self, id: QuantityId, value: AnyValue) {
        self.params.insert(id, value);
    }

    pub(crate) fn set_computed(&mut self, id: QuantityId, value: AnyValue) {
        self.computed.insert(id, value);
    }

    pub(crate) fn forget(&mut self, id: &QuantityId) -> bool {
        self.computed.remove(id).is_some()
    }

    pub(crate) fn n_computed(&self) -> usize {
        self.computed.len()
    }
}

impl std::fmt::Debug for Memo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut params: Vec<_> = self.params.keys().map(|id| id.name()).collect();
        let mut computed: Vec<_> = self.computed.keys().map(|id| id.name()).collect();
        params.sort_unstable();
        computed.sort_unstable();
        f.debug_struct("Memo")
            .field("params", &params)
            .field("computed", &computed)
            .finish()
    }
}

/// A function usable as a provider
///
/// Implemented for any `Fn(&A::Value, &B::Value, ...) -> Result<O, E>` with up
/// to eight inputs, where `Args = (A, B, ...)` is the tuple of input
/// quantities and `E` converts into a boxed error.
pub trait ProviderFn<Args, O>: Send + Sync + 'static {
    /// Input quantities in argument order
    fn inputs(&self) -> Vec<QuantityId>;

    /// Fetch the inputs from the memo and call the function
    fn call(&self, memo: &Memo, output: QuantityId) -> Result<O>;
}

macro_rules! impl_provider_fn {
    ($($arg:ident),*) => {
        impl<Func, O, E, $($arg),*> ProviderFn<($($arg,)*), O> for Func
        where
            Func: Fn($(&<$arg as Quantity>::Value),*) -> core::result::Result<O, E>
                + Send
                + Sync
                + 'static,
            E: Into<BoxError>,
            $($arg: Quantity,)*
        {
            fn inputs(&self) -> Vec<QuantityId> {
                vec![$(QuantityId::of::<$arg>()),*]
            }

            #[allow(non_snake_case, unused_variables)]
            fn call(&self, memo: &Memo, output: QuantityId) -> Result<O> {
                $(let $arg = memo.fetch::<$arg>()?;)*
                (self)($(&*$arg),*).map_err(|e| Error::Provider {
                    quantity: output.name(),
                    source: e.into(),
                })
            }
        }
    };
}

impl_provider_fn!();
impl_provider_fn!(A);
impl_provider_fn!(A, B);
impl_provider_fn!(A, B, C);
impl_provider_fn!(A, B, C, D);
impl_provider_fn!(A, B, C, D, F);
impl_provider_fn!(A, B, C, D, F, G);
impl_provider_fn!(A, B, C, D, F, G, H);
impl_provider_fn!(A, B, C, D, F, G, H, I);

/// A node of the provider graph
///
/// Declares an ordered list of inputs and produces exactly one output. The
/// function must be pure: the same inputs always give the same output, which
/// is what makes memoisation sound.
///
/// Cloning is cheap, the function itself is shared.
#[derive(Clone)]
pub struct Provider {
    output: QuantityId,
    inputs: Vec<QuantityId>,
    compute: Arc<ComputeFn>,
}

impl Provider {
    /// Wrap a function producing `Out` from the quantities in `Args`
    ///
    /// ```rust
    /// # use std::convert::Infallible;
    /// # use bifrost_pipeline::{quantity, Provider};
    /// quantity! {
    ///     pub Distance: f64;
    ///     pub Speed: f64;
    ///     pub Duration: f64;
    /// }
    ///
    /// let p = Provider::new::<Duration, (Distance, Speed)>(
    ///     |d: &f64, v: &f64| -> Result<f64, Infallible> { Ok(d / v) },
    /// );
    /// assert_eq!(p.output().name(), "Duration");
    /// assert_eq!(p.inputs().len(), 2);
    /// ```
    pub fn new<Out, Args>(f: impl ProviderFn<Args, Out::Value>) -> Self
    where
        Out: Quantity,
        Args: 'static,
    {
        let output = QuantityId::of::<Out>();
        let inputs = f.inputs();
        let compute = move |memo: &Memo| -> Result<AnyValue> {
            let value = f.call(memo, output)?;
            Ok(Arc::new(value) as AnyValue)
        };

        Self {
            output,
            inputs,
            compute: Arc::new(compute),
        }
    }

    /// The quantity this provider produces
    pub fn output(&self) -> QuantityId {
        self.output
    }

    /// The quantities this provider needs, in argument order
    pub fn inputs(&self) -> &[QuantityId] {
        &self.inputs
    }

    pub(crate) fn compute(&self, memo: &Memo) -> Result<AnyValue> {
        (self.compute)(memo)
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inputs: Vec<_> = self.inputs.iter().map(|id| id.name()).collect();
        f.debug_struct("Provider")
            .field("output", &self.output.name())
            .field("inputs", &inputs)
            .finish()
    }
}
