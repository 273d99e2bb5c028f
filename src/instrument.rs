//! Typed description of the instrument handed to the reduction

use bifrost_conservation::SampleRotations;
use bifrost_pipeline::Pipeline;
use bifrost_primary::{Chopper, InconsistentEventPolicy, Source};
use bifrost_secondary::{Analyzer, DetectorPixel, PixelMap};
use bifrost_units::Length;
use nalgebra::{Unit, Vector3};

use crate::error::Result;
use crate::providers::standard_graph;
use crate::quantities::*;

/// Everything about the instrument that does not change between events
///
/// All fields are already validated core objects. Build one directly or from
/// an [InstrumentConfig](crate::InstrumentConfig).
#[derive(Debug, Clone, PartialEq)]
pub struct Instrument {
    /// Sample position in the lab frame (m)
    pub sample_position: Vector3<f64>,
    /// Incident beam direction at the sample
    pub beam: Unit<Vector3<f64>>,
    /// Pulsed source
    pub source: Source,
    /// Choppers in beam order
    pub choppers: Vec<Chopper>,
    /// Source to sample distance
    pub primary_flight_path: Length,
    /// Analyzer crystals
    pub analyzers: Vec<Analyzer>,
    /// Detector pixels
    pub pixels: Vec<DetectorPixel>,
    /// Analyzer of every pixel
    pub pixel_map: PixelMap,
    /// Sample rotation of every setting
    pub rotations: SampleRotations,
    /// Treatment of events outside the transmitted phase space
    pub policy: InconsistentEventPolicy,
}

impl Instrument {
    /// Pipeline over the standard providers with every instrument parameter set
    ///
    /// Only the event columns remain to be supplied, see
    /// [insert_events()](crate::insert_events).
    pub fn pipeline(&self) -> Result<Pipeline> {
        let mut pipeline = Pipeline::new(standard_graph()?);
        pipeline
            .insert::<SamplePosition>(self.sample_position)
            .insert::<BeamDirection>(self.beam)
            .insert::<PulsedSource>(self.source.clone())
            .insert::<Choppers>(self.choppers.clone())
            .insert::<PrimaryFlightPath>(self.primary_flight_path)
            .insert::<Analyzers>(self.analyzers.clone())
            .insert::<DetectorPixels>(self.pixels.clone())
            .insert::<PixelAnalyzerMap>(self.pixel_map.clone())
            .insert::<SampleOrientations>(self.rotations.clone())
            .insert::<UnwrapPolicy>(self.policy);
        Ok(pipeline)
    }
}
