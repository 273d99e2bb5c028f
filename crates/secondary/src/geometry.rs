//! Per-pixel flight paths through the secondary spectrometer

use std::collections::HashMap;

use bifrost_units::{Energy, Length, Time, Velocity, Wavenumber};
use bifrost_utils::{f, ValueExt};
use log::debug;
use nalgebra::{Unit, Vector3};
use rayon::prelude::*;

use crate::analyzer::{Analyzer, AnalyzerId};
use crate::bragg;
use crate::detector::{DetectorPixel, PixelId, PixelMap};
use crate::error::{Error, Result};

/// Shortest leg accepted as a real flight path (m)
const MIN_LEG_LENGTH: f64 = 1e-9;

/// Path of a neutron from the sample via one analyzer to one pixel
#[derive(Debug, Clone, PartialEq)]
pub struct PixelPath {
    /// Detector pixel
    pub pixel: PixelId,
    /// Analyzer reflecting onto the pixel
    pub analyzer: AnalyzerId,
    /// Vector from the sample to the analyzer (m)
    pub sample_analyzer: Vector3<f64>,
    /// Vector from the analyzer to the pixel (m)
    pub analyzer_detector: Vector3<f64>,
    /// Glancing angle of the sample→analyzer leg on the analyzer planes (radians)
    pub glancing_angle: f64,
    /// Reflected wavevector magnitude
    pub final_wavenumber: Wavenumber,
    /// Reflected energy
    pub final_energy: Energy,
    /// Flight time from the sample to the pixel
    pub flight_time: Time,
}

impl PixelPath {
    /// Trace the path from `sample` through `analyzer` to `pixel`
    ///
    /// The final energy depends only on the analyzer d-spacing, so all pixels
    /// behind one analyzer share it. Only the analyzer→detector
    /// leg differs between them.
    pub fn trace(sample: &Vector3<f64>, analyzer: &Analyzer, pixel: &DetectorPixel) -> Result<Self> {
        let sample_analyzer = analyzer.position() - sample;
        let analyzer_detector = pixel.position - analyzer.position();

        if sample_analyzer.norm() < MIN_LEG_LENGTH {
            return Err(Error::DegenerateGeometry {
                pixel: pixel.id,
                reason: "analyzer coincides with the sample",
            });
        }
        if analyzer_detector.norm() < MIN_LEG_LENGTH {
            return Err(Error::DegenerateGeometry {
                pixel: pixel.id,
                reason: "pixel coincides with its analyzer",
            });
        }

        let theta = bragg::glancing_angle(&sample_analyzer, &analyzer.plane_normal());
        let final_wavenumber = bragg::final_wavevector(analyzer.d_spacing());
        let final_energy = Energy::from_wavenumber(final_wavenumber);
        let velocity = Velocity::from_wavenumber(final_wavenumber);

        let legs = Length::new(sample_analyzer.norm()) + Length::new(analyzer_detector.norm());
        let flight_time = legs / velocity;

        Ok(Self {
            pixel: pixel.id,
            analyzer: analyzer.id(),
            sample_analyzer,
            analyzer_detector,
            glancing_angle: theta,
            final_wavenumber,
            final_energy,
            flight_time,
        })
    }

    /// Length of the sample→analyzer leg
    pub fn sample_analyzer_length(&self) -> Length {
        Length::new(self.sample_analyzer.norm())
    }

    /// Length of the analyzer→detector leg
    pub fn analyzer_detector_length(&self) -> Length {
        Length::new(self.analyzer_detector.norm())
    }

    /// Total secondary flight path
    pub fn path_length(&self) -> Length {
        self.sample_analyzer_length() + self.analyzer_detector_length()
    }

    /// Direction of the final wavevector at the sample
    pub fn final_direction(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.sample_analyzer)
    }

    /// Scattering angle 2θ between the incident beam and the final direction
    pub fn scattering_angle(&self, beam: &Unit<Vector3<f64>>) -> f64 {
        beam.angle(&self.sample_analyzer)
    }
}

impl std::fmt::Display for PixelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "pixel {:>6} | analyzer {:>3} | L2 {} m | Ef {} meV | t {} s",
            self.pixel,
            self.analyzer,
            self.path_length().value().sci(4, 2),
            self.final_energy.value().sci(4, 2),
            self.flight_time.value().sci(4, 2),
        )
    }
}

/// Flight paths for every detector pixel
///
/// Pixel order follows the order the pixels were supplied in, and lookups by
/// [PixelId] go through an index so events can refer to pixels directly.
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryGeometry {
    paths: Vec<PixelPath>,
    index: HashMap<PixelId, usize>,
}

impl SecondaryGeometry {
    /// Trace every pixel
    ///
    /// Fails fast if any pixel is unmapped, maps to an analyzer that was not
    /// supplied, or if any id is duplicated.
    pub fn compute(
        sample: &Vector3<f64>,
        analyzers: &[Analyzer],
        pixels: &[DetectorPixel],
        map: &PixelMap,
    ) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(analyzers.len());
        for analyzer in analyzers {
            if by_id.insert(analyzer.id(), analyzer).is_some() {
                return Err(Error::DuplicateAnalyzer(analyzer.id()));
            }
        }

        let mut index = HashMap::with_capacity(pixels.len());
        for (i, pixel) in pixels.iter().enumerate() {
            if index.insert(pixel.id, i).is_some() {
                return Err(Error::DuplicatePixel(pixel.id));
            }
        }

        let paths = pixels
            .par_iter()
            .map(|pixel| {
                let id = map.analyzer_of(pixel.id)?;
                let analyzer = by_id.get(&id).ok_or(Error::UnknownAnalyzer {
                    pixel: pixel.id,
                    analyzer: id,
                })?;
                PixelPath::trace(sample, analyzer, pixel)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Traced {} pixels over {} analyzers",
            paths.len(),
            analyzers.len()
        );

        Ok(Self { paths, index })
    }

    /// Number of pixels
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True if there are no pixels
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// All paths in pixel order
    pub fn paths(&self) -> &[PixelPath] {
        &self.paths
    }

    /// Position of a pixel in the pixel order
    pub fn index_of(&self, pixel: PixelId) -> Result<usize> {
        self.index
            .get(&pixel)
            .copied()
            .ok_or(Error::UnknownPixel(pixel))
    }

    /// Path for a single pixel
    pub fn path(&self, pixel: PixelId) -> Result<&PixelPath> {
        Ok(&self.paths[self.index_of(pixel)?])
    }

    /// Positions in the pixel order for a list of event pixels
    ///
    /// Fails with [Error::UnknownPixel] if any event refers to a pixel that is
    /// not part of the geometry.
    pub fn indices_of(&self, pixels: &[PixelId]) -> Result<Vec<usize>> {
        pixels.par_iter().map(|p| self.index_of(*p)).collect()
    }

    /// Final energy of every pixel
    pub fn final_energies(&self) -> Vec<Energy> {
        self.paths.iter().map(|p| p.final_energy).collect()
    }

    /// Total secondary flight time of every pixel
    pub fn flight_times(&self) -> Vec<Time> {
        self.paths.iter().map(|p| p.flight_time).collect()
    }

    /// Total secondary flight path of every pixel
    pub fn path_lengths(&self) -> Vec<Length> {
        self.paths.iter().map(|p| p.path_length()).collect()
    }

    /// Final wavevector direction at the sample for every pixel
    pub fn final_directions(&self) -> Vec<Unit<Vector3<f64>>> {
        self.paths.iter().map(|p| p.final_direction()).collect()
    }

    /// Scattering angle 2θ of every pixel relative to `beam`
    pub fn scattering_angles(&self, beam: &Unit<Vector3<f64>>) -> Vec<f64> {
        self.paths.iter().map(|p| p.scattering_angle(beam)).collect()
    }

    /// Multi-line table of every pixel path
    pub fn summary(&self) -> String {
        let mut s = f!("{} pixels\n", self.len());
        for path in &self.paths {
            s += &f!("{path}\n");
        }
        s
    }
}
