//! Result and Error types for bifrost-pipeline

/// Type alias for `Result<T, pipeline::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// Boxed error returned by a failing provider
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Structural problems with the provider graph
///
/// These are fatal at setup and never recoverable at runtime.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// A second provider was registered for an already produced quantity
    #[error("{quantity} already has a provider")]
    DuplicateProducer { quantity: &'static str },

    /// Registering the provider of `quantity` would close a dependency cycle
    #[error("provider of {quantity} closes a dependency cycle through {through}")]
    Cycle {
        quantity: &'static str,
        through: &'static str,
    },
}

/// The error type for the `bifrost-pipeline` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Duplicate producer or cycle in the provider graph
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// No path from the supplied parameters to the requested quantity
    #[error("unable to resolve {target}: no parameter or provider for {missing}")]
    UnresolvedDependency {
        target: &'static str,
        missing: &'static str,
    },

    /// A type-erased value does not match the declared value type
    #[error("value supplied for {quantity} is not of the declared type {expected}")]
    Unit {
        quantity: &'static str,
        expected: &'static str,
    },

    /// A provider returned an error
    #[error("provider of {quantity} failed: {source}")]
    Provider {
        quantity: &'static str,
        #[source]
        source: BoxError,
    },
}

impl Error {
    /// Downcast the error of a failing provider to a concrete type
    ///
    /// Returns `None` for any other variant or if the provider failed with a
    /// different error type.
    pub fn provider_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Provider { source, .. } => source.downcast_ref::<E>(),
            _ => None,
        }
    }
}
