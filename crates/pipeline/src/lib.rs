//! Typed provider graph and memoising resolver
//!
//! The moving parts are:
//!
//! - [Quantity]: a marker type naming one physical value and its Rust type
//! - [Provider]: a pure function producing one quantity from others
//! - [ProviderGraph]: the registry of providers, kept acyclic with at most
//!   one producer per quantity
//! - [Pipeline]: one resolution session owning parameters and a memo
#![doc = include_str!("../readme.md")]

mod error;
mod graph;
mod pipeline;
mod provider;
mod quantity;

#[doc(inline)]
pub use error::{BoxError, Error, GraphError, Result};

#[doc(inline)]
pub use graph::ProviderGraph;

#[doc(inline)]
pub use pipeline::Pipeline;

#[doc(inline)]
pub use provider::{AnyValue, Memo, Provider, ProviderFn};

#[doc(inline)]
pub use quantity::{Quantity, QuantityId};
