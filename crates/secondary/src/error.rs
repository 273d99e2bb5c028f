//! Result and Error types for bifrost-secondary

use crate::analyzer::AnalyzerId;
use crate::detector::PixelId;

/// Type alias for `Result<T, secondary::Error>`
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `bifrost-secondary` crate
///
/// Every variant is a data-integrity problem with the supplied geometry.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    /// The pixel has no entry in the pixel map
    #[error("pixel {0} is not mapped to any analyzer")]
    UnmappedPixel(PixelId),

    /// The pixel map points at an analyzer that was not supplied
    #[error("pixel {pixel} is mapped to unknown analyzer {analyzer}")]
    UnknownAnalyzer { pixel: PixelId, analyzer: AnalyzerId },

    /// An event or lookup refers to a pixel that is not in the geometry
    #[error("pixel {0} is not part of the detector geometry")]
    UnknownPixel(PixelId),

    /// The same pixel id was supplied twice
    #[error("pixel {0} is defined more than once")]
    DuplicatePixel(PixelId),

    /// The same analyzer id was supplied twice
    #[error("analyzer {0} is defined more than once")]
    DuplicateAnalyzer(AnalyzerId),

    /// Bragg's law needs a strictly positive lattice spacing
    #[error("analyzer {analyzer} has non-positive d-spacing {d_spacing} Å")]
    NonPositiveDSpacing { analyzer: AnalyzerId, d_spacing: f64 },

    /// Zero-length flight legs
    #[error("degenerate geometry for pixel {pixel}: {reason}")]
    DegenerateGeometry { pixel: PixelId, reason: &'static str },
}
