//! Instrument configuration files
//!
//! The configuration is a plain serde description of the instrument. Angles
//! are in degrees for chopper windows and scaled-axis rotation vectors in
//! radians for orientations, lengths in metres, times in milliseconds and
//! wavelengths in Å. [InstrumentConfig::instrument()] validates it and builds
//! the typed [Instrument].

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use bifrost_conservation::{SampleRotations, SettingId};
use bifrost_primary::{Chopper, InconsistentEventPolicy, Source};
use bifrost_secondary::{Analyzer, AnalyzerId, DetectorPixel, PixelId, PixelMap};
use bifrost_units::{Frequency, Length, Time, Wavelength};
use bifrost_utils::f;
use log::debug;
use nalgebra::{Rotation3, Unit, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::instrument::Instrument;

/// Complete instrument description
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct InstrumentConfig {
    /// Sample position and beam direction
    pub sample: SampleConfig,
    /// Pulsed source
    pub source: SourceConfig,
    /// Source to sample distance (m)
    pub primary_flight_path: f64,
    /// Choppers in beam order
    #[serde(default)]
    pub choppers: Vec<ChopperConfig>,
    /// Analyzer crystals
    pub analyzers: Vec<AnalyzerConfig>,
    /// Detector pixels and their analyzers
    pub pixels: Vec<PixelConfig>,
    /// Sample rotation of every setting
    pub settings: Vec<SettingConfig>,
    /// Treatment of events outside the transmitted phase space
    pub policy: PolicyConfig,
}

/// Sample placement
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SampleConfig {
    /// Position in the lab frame (m)
    pub position: [f64; 3],
    /// Incident beam direction, normalised on use
    #[serde(default = "default_beam")]
    pub beam: [f64; 3],
}

fn default_beam() -> [f64; 3] {
    [0.0, 0.0, 1.0]
}

/// Pulsed source
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SourceConfig {
    /// Repetition frequency (Hz)
    pub frequency: f64,
    /// Emission start of each pulse (ms)
    #[serde(default)]
    pub delay_ms: f64,
    /// Pulse length (ms)
    pub duration_ms: f64,
    /// Shortest emitted wavelength (Å)
    pub wavelength_min: f64,
    /// Longest emitted wavelength (Å)
    pub wavelength_max: f64,
}

/// Disc chopper
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChopperConfig {
    /// Descriptive name
    pub name: String,
    /// Rotation frequency (Hz)
    pub frequency: f64,
    /// Phase offset (degrees)
    #[serde(default)]
    pub phase_deg: f64,
    /// Angular openings `[start, end]` (degrees)
    pub windows_deg: Vec<[f64; 2]>,
    /// Distance from the source (m)
    pub distance: f64,
}

/// Analyzer crystal
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Analyzer identifier
    pub id: u32,
    /// Position in the lab frame (m)
    pub position: [f64; 3],
    /// Scaled-axis rotation of the crystal frame into the lab frame (radians)
    #[serde(default)]
    pub orientation: [f64; 3],
    /// Lattice spacing (Å)
    pub d_spacing: f64,
}

/// Detector pixel
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PixelConfig {
    /// Pixel identifier as recorded with events
    pub id: u32,
    /// Position in the lab frame (m)
    pub position: [f64; 3],
    /// Analyzer reflecting onto this pixel
    pub analyzer: u32,
}

/// Sample orientation of one setting
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SettingConfig {
    /// Setting identifier as recorded with events
    pub id: u32,
    /// Scaled-axis rotation of the sample table into the lab frame (radians)
    #[serde(default)]
    pub rotation: [f64; 3],
}

/// Treatment of events outside the transmitted phase space
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PolicyConfig {
    /// Drop inconsistent events and count them
    Exclude,
    /// Abort the reduction
    Fail,
}

impl From<PolicyConfig> for InconsistentEventPolicy {
    fn from(policy: PolicyConfig) -> Self {
        match policy {
            PolicyConfig::Exclude => InconsistentEventPolicy::Exclude,
            PolicyConfig::Fail => InconsistentEventPolicy::Fail,
        }
    }
}

impl InstrumentConfig {
    /// Validate the configuration and build the typed instrument
    pub fn instrument(&self) -> Result<Instrument> {
        let beam = Vector3::from(self.sample.beam);
        if !(beam.norm() > 0.0 && beam.iter().all(|x| x.is_finite())) {
            return Err(Error::InvalidConfig(
                "beam direction must be a finite non-zero vector".to_string(),
            ));
        }

        let source = Source::from_wavelengths(
            Frequency::new(self.source.frequency),
            Time::from_millis(self.source.delay_ms),
            Time::from_millis(self.source.duration_ms),
            Wavelength::new(self.source.wavelength_min),
            Wavelength::new(self.source.wavelength_max),
        )?;

        let choppers = self
            .choppers
            .iter()
            .map(|c| {
                let windows: Vec<(f64, f64)> = c.windows_deg.iter().map(|w| (w[0], w[1])).collect();
                Chopper::from_degrees(
                    c.name.clone(),
                    Frequency::new(c.frequency),
                    c.phase_deg,
                    &windows,
                    Length::new(c.distance),
                )
            })
            .collect::<bifrost_primary::Result<Vec<_>>>()?;

        let analyzers = self
            .analyzers
            .iter()
            .map(|a| {
                Analyzer::new(
                    AnalyzerId(a.id),
                    Vector3::from(a.position),
                    Rotation3::new(Vector3::from(a.orientation)),
                    a.d_spacing,
                )
            })
            .collect::<bifrost_secondary::Result<Vec<_>>>()?;

        let pixels = self
            .pixels
            .iter()
            .map(|p| DetectorPixel::new(PixelId(p.id), Vector3::from(p.position)))
            .collect();

        let mut pixel_map = PixelMap::new();
        for p in &self.pixels {
            if pixel_map.insert(PixelId(p.id), AnalyzerId(p.analyzer)).is_some() {
                return Err(Error::InvalidConfig(f!("pixel {} is listed more than once", p.id)));
            }
        }

        let mut rotations = SampleRotations::new();
        for s in &self.settings {
            let rotation = Rotation3::new(Vector3::from(s.rotation));
            if rotations.insert(SettingId(s.id), rotation).is_some() {
                return Err(Error::InvalidConfig(f!("setting {} is listed more than once", s.id)));
            }
        }

        debug!(
            "Instrument with {} choppers, {} analyzers, {} pixels, {} settings",
            choppers.len(),
            analyzers.len(),
            self.pixels.len(),
            rotations.len()
        );

        Ok(Instrument {
            sample_position: Vector3::from(self.sample.position),
            beam: Unit::new_normalize(beam),
            source,
            choppers,
            primary_flight_path: Length::new(self.primary_flight_path),
            analyzers,
            pixels,
            pixel_map,
            rotations,
            policy: self.policy.into(),
        })
    }
}

/// Read an instrument configuration from a JSON file
pub fn read_json<P: AsRef<Path>>(path: P) -> Result<InstrumentConfig> {
    let path: &Path = Path::new(path.as_ref());
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
