//! `bifrost` reduces time-tagged neutron events from an indirect-geometry
//! spectrometer to energy and momentum transfer
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]

// Re-exports of workspace crates.
#[doc(inline)]
pub use bifrost_conservation as conservation;

#[doc(inline)]
pub use bifrost_pipeline as pipeline;

#[doc(inline)]
pub use bifrost_primary as primary;

#[doc(inline)]
pub use bifrost_secondary as secondary;

#[doc(inline)]
pub use bifrost_units as units;

#[doc(inline)]
pub use bifrost_utils as utils;

// crate modules
pub mod providers;
pub mod quantities;
mod config;
mod error;
mod events;
mod instrument;
mod workflow;

#[doc(inline)]
pub use config::{
    read_json, AnalyzerConfig, ChopperConfig, InstrumentConfig, PixelConfig, PolicyConfig,
    SampleConfig, SettingConfig, SourceConfig,
};

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use events::{read_events, EventTable, FrameUnwrapping, ReducedEvents};

#[doc(inline)]
pub use instrument::Instrument;

#[doc(inline)]
pub use workflow::{insert_events, reduce, reduce_segments};
