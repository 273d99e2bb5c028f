//! Primary spectrometer phase space
//!
//! Projects the source pulse through a cascade of choppers and recovers the
//! emitting pulse of every detected event.
#![doc = include_str!("../readme.md")]

pub mod polygon;
mod chopper;
mod error;
mod phase_space;
mod source;
mod unwrap;

#[doc(inline)]
pub use chopper::Chopper;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use phase_space::{PhaseSpace, Unwrapped};

#[doc(inline)]
pub use source::Source;

#[doc(inline)]
pub use unwrap::{unwrap_frames, InconsistentEventPolicy, UnwrapSummary};
