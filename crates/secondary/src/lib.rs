//! Secondary spectrometer geometry
//!
//! Converts the positioned analyzer/detector layout into per-pixel flight
//! paths, flight times and final energies.
#![doc = include_str!("../readme.md")]

pub mod bragg;
mod analyzer;
mod detector;
mod error;
mod geometry;

#[doc(inline)]
pub use analyzer::{Analyzer, AnalyzerId};

#[doc(inline)]
pub use detector::{DetectorPixel, PixelId, PixelMap};

#[doc(inline)]
pub use geometry::{PixelPath, SecondaryGeometry};

#[doc(inline)]
pub use error::{Error, Result};
