//! Dimension-typed physical quantities for neutron time-of-flight
//!
//! Values crossing crate boundaries carry their unit in the type. Conversions
//! between energy, wavenumber, velocity and slowness use the neutron mass and
//! are collected in one place so no crate hard-codes its own factors.
#![doc = include_str!("../readme.md")]

pub mod constants;
mod kinematics;
mod quantity;

#[doc(inline)]
pub use quantity::{Energy, Frequency, Length, Slowness, Time, Velocity, Wavelength, Wavenumber};
