//! Energy and momentum transfer
//!
//! Per-event arrays in, per-event arrays out. Array order is the event order.
#![doc = include_str!("../readme.md")]

mod error;
mod sample;
mod transfer;

#[doc(inline)]
pub use error::{Error, Result};

#[doc(inline)]
pub use sample::{SampleRotations, SettingId};

#[doc(inline)]
pub use transfer::{
    energy_transfer, energy_transfer_of, momentum_transfer, momentum_transfer_lab, q_magnitudes,
};
