//! The standard provider set
//!
//! Each function here is a pure provider over the quantities in
//! [quantities](crate::quantities). Signatures mirror the quantity value
//! types, hence the `&Vec<_>` arguments.
#![allow(clippy::ptr_arg)]

use std::convert::Infallible;

use bifrost_conservation::{SampleRotations, SettingId};
use bifrost_pipeline::{Provider, ProviderGraph};
use bifrost_primary::{
    unwrap_frames, Chopper, InconsistentEventPolicy, PhaseSpace, Source, Unwrapped,
};
use bifrost_secondary::{Analyzer, DetectorPixel, PixelId, PixelMap, SecondaryGeometry};
use bifrost_units::{Energy, Length, Time, Wavenumber};
use nalgebra::{Unit, Vector3};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::events::{FrameUnwrapping, ReducedEvents};
use crate::quantities::*;

/// Every provider of the standard reduction
pub fn standard_providers() -> Vec<Provider> {
    vec![
        // secondary spectrometer
        Provider::new::<Secondary, (SamplePosition, Analyzers, DetectorPixels, PixelAnalyzerMap)>(
            secondary_geometry,
        ),
        Provider::new::<EventPixelIndices, (Secondary, EventPixels)>(event_pixel_indices),
        Provider::new::<SecondaryFlightTimes, (Secondary, EventPixelIndices)>(secondary_flight_times),
        Provider::new::<FinalEnergies, (Secondary, EventPixelIndices)>(final_energies),
        Provider::new::<FinalWavevectors, (Secondary, EventPixelIndices)>(final_wavevectors),
        Provider::new::<FinalDirections, (Secondary, EventPixelIndices)>(final_directions),
        // primary spectrometer
        Provider::new::<TransmittedPhaseSpace, (PulsedSource, Choppers, PrimaryFlightPath)>(
            transmitted_phase_space,
        ),
        Provider::new::<Unwrapping, (TransmittedPhaseSpace, AliasedTimes, SecondaryFlightTimes, UnwrapPolicy)>(
            frame_unwrapping,
        ),
        Provider::new::<RetainedEvents, (Unwrapping,)>(retained_events),
        Provider::new::<PulseOffsets, (Unwrapping,)>(pulse_offsets),
        Provider::new::<UnwrappedTimes, (Unwrapping,)>(unwrapped_times),
        Provider::new::<PrimaryFlightTimes, (Unwrapping,)>(primary_flight_times),
        Provider::new::<IncidentEnergies, (Unwrapping,)>(incident_energies),
        Provider::new::<IncidentWavevectors, (IncidentEnergies,)>(incident_wavevectors),
        // conservation
        Provider::new::<EnergyTransfer, (IncidentEnergies, FinalEnergies, RetainedEvents)>(energy_transfer),
        Provider::new::<
            MomentumTransfer,
            (
                IncidentWavevectors,
                BeamDirection,
                FinalWavevectors,
                FinalDirections,
                EventSettings,
                SampleOrientations,
                RetainedEvents,
            ),
        >(momentum_transfer),
        Provider::new::<MomentumMagnitudes, (MomentumTransfer,)>(momentum_magnitudes),
        Provider::new::<Reduced, (RetainedEvents, EnergyTransfer, MomentumTransfer, MomentumMagnitudes, Unwrapping)>(
            reduced_events,
        ),
    ]
}

/// Provider graph holding [standard_providers()]
pub fn standard_graph() -> Result<ProviderGraph> {
    Ok(ProviderGraph::from_providers(standard_providers())?)
}

/// Values at the given positions, in the given order
fn gather<T: Copy + Send + Sync>(what: &'static str, values: &[T], indices: &[usize]) -> Result<Vec<T>> {
    indices
        .par_iter()
        .map(|i| {
            values.get(*i).copied().ok_or(Error::IndexOutOfRange {
                what,
                index: *i,
                len: values.len(),
            })
        })
        .collect()
}

/// Trace every pixel through its analyzer
pub fn secondary_geometry(
    sample: &Vector3<f64>,
    analyzers: &Vec<Analyzer>,
    pixels: &Vec<DetectorPixel>,
    map: &PixelMap,
) -> bifrost_secondary::Result<SecondaryGeometry> {
    SecondaryGeometry::compute(sample, analyzers, pixels, map)
}

/// Pixel order position of each event's pixel
pub fn event_pixel_indices(
    geometry: &SecondaryGeometry,
    pixels: &Vec<PixelId>,
) -> bifrost_secondary::Result<Vec<usize>> {
    geometry.indices_of(pixels)
}

/// Sample to detector flight time of every event
pub fn secondary_flight_times(
    geometry: &SecondaryGeometry,
    indices: &Vec<usize>,
) -> Result<Vec<Time>> {
    gather("pixel paths", &geometry.flight_times(), indices)
}

/// Final energy of every event
pub fn final_energies(
    geometry: &SecondaryGeometry,
    indices: &Vec<usize>,
) -> Result<Vec<Energy>> {
    gather("pixel paths", &geometry.final_energies(), indices)
}

/// Final wavevector magnitude of every event
pub fn final_wavevectors(
    geometry: &SecondaryGeometry,
    indices: &Vec<usize>,
) -> Result<Vec<Wavenumber>> {
    let k: Vec<_> = geometry.paths().iter().map(|p| p.final_wavenumber).collect();
    gather("pixel paths", &k, indices)
}

/// Final wavevector direction of every event
pub fn final_directions(
    geometry: &SecondaryGeometry,
    indices: &Vec<usize>,
) -> Result<Vec<Unit<Vector3<f64>>>> {
    gather("pixel paths", &geometry.final_directions(), indices)
}

/// Project the source pulse through the chopper cascade
pub fn transmitted_phase_space(
    source: &Source,
    choppers: &Vec<Chopper>,
    distance: &Length,
) -> bifrost_primary::Result<PhaseSpace> {
    PhaseSpace::transmitted(source, choppers, *distance)
}

/// Unwrap every event under the configured policy
pub fn frame_unwrapping(
    phase_space: &PhaseSpace,
    aliased: &Vec<Time>,
    secondary: &Vec<Time>,
    policy: &InconsistentEventPolicy,
) -> bifrost_primary::Result<FrameUnwrapping> {
    let (events, summary) = unwrap_frames(phase_space, aliased, secondary, *policy)?;
    Ok(FrameUnwrapping { events, summary })
}

/// Table positions of unwrapped events
pub fn retained_events(unwrapping: &FrameUnwrapping) -> core::result::Result<Vec<usize>, Infallible> {
    Ok(unwrapping.retained())
}

fn retained<T>(unwrapping: &FrameUnwrapping, f: impl Fn(&Unwrapped) -> T) -> Vec<T> {
    unwrapping.unwrapped().map(f).collect()
}

/// Pulse offset of every retained event
pub fn pulse_offsets(unwrapping: &FrameUnwrapping) -> core::result::Result<Vec<u32>, Infallible> {
    Ok(retained(unwrapping, |e| e.offset))
}

/// Unwrapped detection time of every retained event
pub fn unwrapped_times(unwrapping: &FrameUnwrapping) -> core::result::Result<Vec<Time>, Infallible> {
    Ok(retained(unwrapping, |e| e.unwrapped_time))
}

/// Primary flight time of every retained event
pub fn primary_flight_times(
    unwrapping: &FrameUnwrapping,
) -> core::result::Result<Vec<Time>, Infallible> {
    Ok(retained(unwrapping, |e| e.primary_flight_time))
}

/// Incident energy of every retained event
pub fn incident_energies(unwrapping: &FrameUnwrapping) -> core::result::Result<Vec<Energy>, Infallible> {
    Ok(retained(unwrapping, |e| e.incident_energy))
}

/// Incident wavevector magnitude of every retained event
pub fn incident_wavevectors(energies: &Vec<Energy>) -> core::result::Result<Vec<Wavenumber>, Infallible> {
    Ok(energies.par_iter().map(|e| Wavenumber::from_energy(*e)).collect())
}

/// Energy transfer of every retained event
pub fn energy_transfer(
    incident: &Vec<Energy>,
    scattered: &Vec<Energy>,
    retained: &Vec<usize>,
) -> Result<Vec<Energy>> {
    let scattered = gather("final energies", scattered, retained)?;
    Ok(bifrost_conservation::energy_transfer(incident, &scattered)?)
}

/// Sample-frame momentum transfer of every retained event
///
/// An unknown setting is reported with its row in the event table.
pub fn momentum_transfer(
    incident: &Vec<Wavenumber>,
    beam: &Unit<Vector3<f64>>,
    scattered: &Vec<Wavenumber>,
    directions: &Vec<Unit<Vector3<f64>>>,
    settings: &Vec<SettingId>,
    rotations: &SampleRotations,
    retained: &Vec<usize>,
) -> Result<Vec<Vector3<f64>>> {
    let q = bifrost_conservation::momentum_transfer(
        incident,
        beam,
        &gather("final wavevectors", scattered, retained)?,
        &gather("final directions", directions, retained)?,
        &gather("event settings", settings, retained)?,
        rotations,
    )
    .map_err(|e| match e {
        bifrost_conservation::Error::UnknownSetting { event, setting } => {
            bifrost_conservation::Error::UnknownSetting {
                event: retained.get(event).copied().unwrap_or(event),
                setting,
            }
        }
        other => other,
    })?;
    Ok(q)
}

/// |Q| of every retained event
pub fn momentum_magnitudes(q: &Vec<Vector3<f64>>) -> core::result::Result<Vec<Wavenumber>, Infallible> {
    Ok(bifrost_conservation::q_magnitudes(q))
}

/// Assemble the final coordinate table
pub fn reduced_events(
    retained: &Vec<usize>,
    energy_transfer: &Vec<Energy>,
    q: &Vec<Vector3<f64>>,
    q_magnitude: &Vec<Wavenumber>,
    unwrapping: &FrameUnwrapping,
) -> core::result::Result<ReducedEvents, Infallible> {
    Ok(ReducedEvents {
        event: retained.clone(),
        energy_transfer: energy_transfer.clone(),
        q: q.clone(),
        q_magnitude: q_magnitude.clone(),
        summary: unwrapping.summary.clone(),
    })
}
