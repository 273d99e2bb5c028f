//! Energy and momentum transfer per event

use bifrost_units::{Energy, Wavenumber};
use log::debug;
use nalgebra::{Unit, Vector3};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::sample::{SampleRotations, SettingId};

/// Energy given to the sample by one neutron
pub fn energy_transfer_of(incident: Energy, scattered: Energy) -> Energy {
    incident - scattered
}

/// Momentum transfer of one neutron in the lab frame (Å⁻¹)
///
/// `beam` is the incident direction and `direction` the direction of the
/// scattered wavevector.
pub fn momentum_transfer_lab(
    incident: Wavenumber,
    beam: &Unit<Vector3<f64>>,
    scattered: Wavenumber,
    direction: &Unit<Vector3<f64>>,
) -> Vector3<f64> {
    beam.scale(incident.value()) - direction.scale(scattered.value())
}

/// Energy transfer for every event
pub fn energy_transfer(incident: &[Energy], scattered: &[Energy]) -> Result<Vec<Energy>> {
    check_length("final energies", incident.len(), scattered.len())?;

    Ok(incident
        .par_iter()
        .zip(scattered.par_iter())
        .map(|(ei, ef)| energy_transfer_of(*ei, *ef))
        .collect())
}

/// Momentum transfer for every event in the sample-table frame (Å⁻¹)
///
/// All per-event slices must be aligned with `incident`. Every setting must
/// have a rotation, otherwise the first offending event is reported.
pub fn momentum_transfer(
    incident: &[Wavenumber],
    beam: &Unit<Vector3<f64>>,
    scattered: &[Wavenumber],
    directions: &[Unit<Vector3<f64>>],
    settings: &[SettingId],
    rotations: &SampleRotations,
) -> Result<Vec<Vector3<f64>>> {
    let n = incident.len();
    check_length("final wavevectors", n, scattered.len())?;
    check_length("final directions", n, directions.len())?;
    check_length("settings", n, settings.len())?;

    let frames = settings
        .iter()
        .enumerate()
        .map(|(event, setting)| {
            rotations.get(*setting).ok_or(Error::UnknownSetting {
                event,
                setting: *setting,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let q = (0..n)
        .into_par_iter()
        .map(|i| {
            let lab = momentum_transfer_lab(incident[i], beam, scattered[i], &directions[i]);
            frames[i].inverse_transform_vector(&lab)
        })
        .collect::<Vec<_>>();

    debug!("Momentum transfer for {} events over {} settings", n, rotations.len());
    Ok(q)
}

/// |Q| for every event
pub fn q_magnitudes(q: &[Vector3<f64>]) -> Vec<Wavenumber> {
    q.par_iter().map(|v| Wavenumber::new(v.norm())).collect()
}

fn check_length(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(Error::LengthMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}
