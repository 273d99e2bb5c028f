//! Quantity markers and their runtime identifiers

use std::any::{type_name, TypeId};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

/// A named physical quantity
///
/// Implementors are zero-sized marker types, one per physical array or scalar.
/// The marker type is the identity of the quantity, so two quantities with the
/// same value type (for example two `Vec<f64>` arrays) can never be confused.
///
/// Use the [quantity!](crate::quantity!) macro rather than implementing this
/// by hand.
pub trait Quantity: 'static {
    /// Type of the value this quantity carries
    type Value: Send + Sync + 'static;

    /// Human-readable name used in errors, logs and graph output
    const NAME: &'static str;
}

/// Runtime identifier of a [Quantity]
///
/// Equality and hashing use the type identity of the marker only. The value
/// type identity is kept to validate type-erased values.
#[derive(Debug, Clone, Copy)]
pub struct QuantityId {
    marker: TypeId,
    value: TypeId,
    name: &'static str,
    value_name: &'static str,
}

impl QuantityId {
    /// Identifier of the quantity `Q`
    pub fn of<Q: Quantity>() -> Self {
        Self {
            marker: TypeId::of::<Q>(),
            value: TypeId::of::<Q::Value>(),
            name: Q::NAME,
            value_name: type_name::<Q::Value>(),
        }
    }

    /// Name of the quantity
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Full type name of the value the quantity carries
    pub fn value_name(&self) -> &'static str {
        self.value_name
    }

    /// Type identity of the value the quantity carries
    pub fn value_type(&self) -> TypeId {
        self.value
    }
}

impl PartialEq for QuantityId {
    fn eq(&self, other: &Self) -> bool {
        self.marker == other.marker
    }
}

impl Eq for QuantityId {}

impl Hash for QuantityId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.marker.hash(state);
    }
}

// names first so graph output is stable and readable
impl Ord for QuantityId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name
            .cmp(other.name)
            .then_with(|| self.marker.cmp(&other.marker))
    }
}

impl PartialOrd for QuantityId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for QuantityId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Declare one or more [Quantity] marker types
///
/// Each entry is `visibility Name: ValueType;`, optionally preceded by doc
/// comments and attributes.
///
/// ```rust
/// use bifrost_pipeline::{quantity, Quantity};
///
/// quantity! {
///     /// Distance from source to sample in metres
///     pub PrimaryFlightPath: f64;
///     /// Recorded event times in seconds
///     pub AliasedTimes: Vec<f64>;
/// }
///
/// assert_eq!(PrimaryFlightPath::NAME, "PrimaryFlightPath");
/// ```
#[macro_export]
macro_rules! quantity {
    ($($(#[$meta:meta])* $vis:vis $name:ident: $value:ty;)+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            $vis struct $name;

            impl $crate::Quantity for $name {
                type Value = $value;
                const NAME: &'static str = stringify!($name);
            }
        )+
    };
}
