//! Result and Error types for bifrost-conservation

use crate::sample::SettingId;

/// Type alias for `Result<T, conservation::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `bifrost-conservation` crate
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    /// An event refers to a setting with no sample rotation
    #[error("event {event} was recorded in unknown setting {setting}")]
    UnknownSetting { event: usize, setting: SettingId },

    /// Per-event arrays that must be aligned differ in length
    #[error("expected {expected} values for {what}, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}
