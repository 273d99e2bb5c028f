//! Result and Error types for the utils module

/// Type alias for `Result<T, utils::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for `bifrost_utils`
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    /// An empty slice of floats for SliceExt
    #[error("slice contains no values")]
    SliceContainsNoValues,

    /// The slice of float values contains things like NAN or INFINITY
    #[error("slice contains undefined values (NaN or infinite)")]
    SliceContainsUndefinedValues,
}
