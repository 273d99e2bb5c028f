//! Result and Error types for bifrost-primary

use bifrost_units::Time;

/// Type alias for `Result<T, primary::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `bifrost-primary` crate
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    /// Source parameters are not physical
    #[error("invalid source: {reason}")]
    InvalidSource { reason: String },

    /// Chopper parameters are not physical or not phase-locked to the source
    #[error("invalid chopper '{name}': {reason}")]
    InvalidChopper { name: String, reason: String },

    /// The chopper cascade blocks every neutron of the pulse
    #[error("no neutrons are transmitted to the sample by the chopper cascade")]
    EmptyPhaseSpace,

    /// An event does not fit any transmitted region for any pulse offset
    #[error("event {event} at aliased time {time} is outside the transmitted phase space")]
    PhaseSpaceInconsistency { event: usize, time: Time },

    /// Per-event arrays that must be aligned differ in length
    #[error("expected {expected} values for {what}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}
