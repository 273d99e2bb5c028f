//! Detector pixels and their analyzer assignment

use std::collections::HashMap;

use nalgebra::Vector3;

use crate::analyzer::AnalyzerId;
use crate::error::{Error, Result};

/// Identifier of a detector pixel, as recorded with every event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PixelId(pub u32);

impl std::fmt::Display for PixelId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A positioned detector pixel
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorPixel {
    /// Pixel identifier
    pub id: PixelId,
    /// Centre of the pixel in the lab frame (m)
    pub position: Vector3<f64>,
}

impl DetectorPixel {
    /// Pixel at a lab-frame position
    pub fn new(id: PixelId, position: Vector3<f64>) -> Self {
        Self { id, position }
    }
}

/// Explicit assignment of pixels to analyzers
///
/// Many pixels may share one analyzer, each pixel has exactly one. The
/// surrounding workflow resolves this from the instrument description; it is
/// never inferred from names here.
///
/// ```rust
/// # use bifrost_secondary::{AnalyzerId, PixelId, PixelMap};
/// let map: PixelMap = [(PixelId(0), AnalyzerId(0)), (PixelId(1), AnalyzerId(0))]
///     .into_iter()
///     .collect();
///
/// assert_eq!(map.analyzer_of(PixelId(1)), Ok(AnalyzerId(0)));
/// assert!(map.analyzer_of(PixelId(7)).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PixelMap {
    map: HashMap<PixelId, AnalyzerId>,
}

impl PixelMap {
    /// Empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a pixel to an analyzer, returning any previous assignment
    pub fn insert(&mut self, pixel: PixelId, analyzer: AnalyzerId) -> Option<AnalyzerId> {
        self.map.insert(pixel, analyzer)
    }

    /// Analyzer of a pixel
    ///
    /// Fails with [Error::UnmappedPixel] if the pixel has no assignment.
    pub fn analyzer_of(&self, pixel: PixelId) -> Result<AnalyzerId> {
        self.map
            .get(&pixel)
            .copied()
            .ok_or(Error::UnmappedPixel(pixel))
    }

    /// All pixels assigned to `analyzer`, sorted
    pub fn pixels_of(&self, analyzer: AnalyzerId) -> Vec<PixelId> {
        let mut pixels: Vec<_> = self
            .map
            .iter()
            .filter(|(_, a)| **a == analyzer)
            .map(|(p, _)| *p)
            .collect();
        pixels.sort();
        pixels
    }

    /// Number of mapped pixels
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if no pixels are mapped
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(PixelId, AnalyzerId)> for PixelMap {
    fn from_iter<I: IntoIterator<Item = (PixelId, AnalyzerId)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}
