//! Every quantity known to the standard reduction
//!
//! Parameters are supplied by the caller (usually through
//! [Instrument::pipeline()](crate::Instrument::pipeline) and
//! [insert_events()](crate::insert_events)). Everything else has a provider
//! in [providers](crate::providers).
//!
//! Per-event arrays come in two lengths. Arrays derived from the event table
//! alone follow the table order. Arrays that need an incident energy only
//! exist for retained events and follow the order of [RetainedEvents].

use bifrost_conservation::{SampleRotations, SettingId};
use bifrost_pipeline::quantity;
use bifrost_primary::{Chopper, InconsistentEventPolicy, PhaseSpace, Source};
use bifrost_secondary::{Analyzer, DetectorPixel, PixelId, PixelMap, SecondaryGeometry};
use bifrost_units::{Energy, Length, Time, Wavenumber};
use nalgebra::{Unit, Vector3};

use crate::events::{FrameUnwrapping, ReducedEvents};

quantity! {
    /// Sample position in the lab frame (m)
    pub SamplePosition: Vector3<f64>;
    /// Direction of the incident beam at the sample
    pub BeamDirection: Unit<Vector3<f64>>;
    /// Analyzer crystals
    pub Analyzers: Vec<Analyzer>;
    /// Detector pixels
    pub DetectorPixels: Vec<DetectorPixel>;
    /// Analyzer of every pixel
    pub PixelAnalyzerMap: PixelMap;
    /// Pulsed source
    pub PulsedSource: Source;
    /// Choppers in beam order
    pub Choppers: Vec<Chopper>;
    /// Source to sample distance
    pub PrimaryFlightPath: Length;
    /// Sample rotation of every setting
    pub SampleOrientations: SampleRotations;
    /// Treatment of events outside the transmitted phase space
    pub UnwrapPolicy: InconsistentEventPolicy;

    /// Pixel of every event
    pub EventPixels: Vec<PixelId>;
    /// Recorded time of every event, modulo the source period
    pub AliasedTimes: Vec<Time>;
    /// Setting every event was recorded in
    pub EventSettings: Vec<SettingId>;

    /// Flight paths of every pixel
    pub Secondary: SecondaryGeometry;
    /// Position of each event's pixel in the pixel order
    pub EventPixelIndices: Vec<usize>;
    /// Sample to detector flight time of every event
    pub SecondaryFlightTimes: Vec<Time>;
    /// Final energy of every event
    pub FinalEnergies: Vec<Energy>;
    /// Final wavevector magnitude of every event
    pub FinalWavevectors: Vec<Wavenumber>;
    /// Final wavevector direction of every event
    pub FinalDirections: Vec<Unit<Vector3<f64>>>;

    /// Regions of phase space at the sample reached by pulse 0
    pub TransmittedPhaseSpace: PhaseSpace;
    /// Unwrapping result of every event and the batch summary
    pub Unwrapping: FrameUnwrapping;
    /// Table positions of the events that were unwrapped
    pub RetainedEvents: Vec<usize>;
    /// Pulse offset of every retained event
    pub PulseOffsets: Vec<u32>;
    /// Detection time relative to the emitting pulse of every retained event
    pub UnwrappedTimes: Vec<Time>;
    /// Source to sample flight time of every retained event
    pub PrimaryFlightTimes: Vec<Time>;
    /// Incident energy of every retained event
    pub IncidentEnergies: Vec<Energy>;
    /// Incident wavevector magnitude of every retained event
    pub IncidentWavevectors: Vec<Wavenumber>;

    /// Energy transfer of every retained event
    pub EnergyTransfer: Vec<Energy>;
    /// Momentum transfer in the sample frame of every retained event (Å⁻¹)
    pub MomentumTransfer: Vec<Vector3<f64>>;
    /// |Q| of every retained event
    pub MomentumMagnitudes: Vec<Wavenumber>;
    /// Final per-event coordinate table
    pub Reduced: ReducedEvents;
}
