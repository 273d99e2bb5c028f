//! Result and Error types for bifrost

/// Type alias for `Result<T, bifrost::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `bifrost` crate
///
/// Failures inside a provider are unwrapped back into the error of the crate
/// that raised them, so a phase-space inconsistency surfaces as
/// [Error::Primary] whether it was hit directly or during resolution.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Reading a configuration or event file failed
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    /// A configuration or event file is not valid JSON for its type
    #[error("failed to (de)serialise")]
    FailedSerde(#[from] serde_json::Error),

    /// Graph, resolution or type errors from the pipeline
    #[error(transparent)]
    Pipeline(bifrost_pipeline::Error),

    /// Analyzer and detector geometry errors
    #[error(transparent)]
    Secondary(#[from] bifrost_secondary::Error),

    /// Source, chopper and frame unwrapping errors
    #[error(transparent)]
    Primary(#[from] bifrost_primary::Error),

    /// Energy and momentum transfer errors
    #[error(transparent)]
    Conservation(#[from] bifrost_conservation::Error),

    /// Per-event columns of an event table differ in length
    #[error("event table columns differ in length: {pixels} pixels, {times} times, {settings} settings")]
    RaggedEventTable {
        /// Length of the pixel column
        pixels: usize,
        /// Length of the time column
        times: usize,
        /// Length of the setting column
        settings: usize,
    },

    /// A per-event position points past the end of the column it selects from
    #[error("index {index} is out of range for {len} {what}")]
    IndexOutOfRange {
        /// Column being indexed
        what: &'static str,
        /// Offending position
        index: usize,
        /// Length of the column
        len: usize,
    },

    /// Configuration values that cannot describe a real instrument
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<bifrost_pipeline::Error> for Error {
    fn from(error: bifrost_pipeline::Error) -> Self {
        let (quantity, source) = match error {
            bifrost_pipeline::Error::Provider { quantity, source } => (quantity, source),
            other => return Self::Pipeline(other),
        };

        let source = match source.downcast::<Error>() {
            Ok(e) => return *e,
            Err(source) => source,
        };
        let source = match source.downcast::<bifrost_primary::Error>() {
            Ok(e) => return Self::Primary(*e),
            Err(source) => source,
        };
        let source = match source.downcast::<bifrost_secondary::Error>() {
            Ok(e) => return Self::Secondary(*e),
            Err(source) => source,
        };
        let source = match source.downcast::<bifrost_conservation::Error>() {
            Ok(e) => return Self::Conservation(*e),
            Err(source) => source,
        };

        Self::Pipeline(bifrost_pipeline::Error::Provider { quantity, source })
    }
}
