//! Transmitted phase space at the sample and per-event unwrapping

use bifrost_units::{Energy, Length, Slowness, Time};
use bifrost_utils::{f, SliceExt, ValueExt};
use itertools::Itertools;
use log::{debug, trace};

use crate::chopper::Chopper;
use crate::error::{Error, Result};
use crate::polygon::Polygon;
use crate::source::Source;

/// Relative tolerance for the phase-lock check
const PHASE_LOCK_TOLERANCE: f64 = 1e-9;

/// Regions of the (time, slowness) plane at the sample reached by pulse 0
///
/// Later pulses reach the same regions shifted by whole source periods.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSpace {
    period: Time,
    distance: Length,
    regions: Vec<Polygon>,
    time_range: (Time, Time),
}

/// Result of unwrapping a single event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unwrapped {
    /// Number of source periods between emission and detection
    pub offset: u32,
    /// Detection time relative to the emitting pulse, `τ + n·T`
    pub unwrapped_time: Time,
    /// Arrival time at the sample relative to the emitting pulse
    pub sample_time: Time,
    /// Departure time from the source relative to the emitting pulse
    pub departure_time: Time,
    /// Source to sample flight time
    pub primary_flight_time: Time,
    /// Incident slowness, midpoint of the transmitted chord
    pub slowness: Slowness,
    /// Incident energy
    pub incident_energy: Energy,
}

impl PhaseSpace {
    /// Project pulse 0 through the chopper cascade onto the sample position
    ///
    /// Choppers must be in beam order, upstream of the sample, and rotate at
    /// integer multiples of the source frequency. Fails with
    /// [Error::EmptyPhaseSpace] if nothing reaches the sample.
    pub fn transmitted(source: &Source, choppers: &[Chopper], sample_distance: Length) -> Result<Self> {
        if !(sample_distance.is_finite() && sample_distance > Length::ZERO) {
            return Err(Error::InvalidSource {
                reason: "source to sample distance must be positive".to_string(),
            });
        }
        check_cascade(source, choppers, sample_distance)?;

        let mut regions = vec![Polygon::sheared_pulse(
            source.delay().value(),
            (source.delay() + source.duration()).value(),
            source.fastest().value(),
            source.slowest().value(),
            sample_distance.value(),
        )];

        for chopper in choppers {
            let lead = (sample_distance - chopper.distance()).value();
            regions = regions
                .iter()
                .flat_map(|region| transmit(region, chopper, lead))
                .collect();

            trace!("{} regions after chopper '{}'", regions.len(), chopper.name());
            if regions.is_empty() {
                return Err(Error::EmptyPhaseSpace);
            }
        }

        let (earliest, latest) = regions
            .iter()
            .flat_map(|region| region.vertices().iter().map(|p| p.x))
            .collect::<Vec<f64>>()
            .try_range()
            .map_err(|_| Error::EmptyPhaseSpace)?;

        debug!(
            "Transmitted phase space: {} regions through {} choppers",
            regions.len(),
            choppers.len()
        );

        Ok(Self {
            period: source.period(),
            distance: sample_distance,
            regions,
            time_range: (Time::new(earliest), Time::new(latest)),
        })
    }

    /// Source period
    pub fn period(&self) -> Time {
        self.period
    }

    /// Source to sample distance
    pub fn distance(&self) -> Length {
        self.distance
    }

    /// Transmitted regions, each a convex polygon
    pub fn regions(&self) -> &[Polygon] {
        &self.regions
    }

    /// Earliest and latest sample time reached by pulse 0
    pub fn time_range(&self) -> (Time, Time) {
        self.time_range
    }

    /// Largest pulse offset worth testing for an event
    pub fn max_offset(&self, aliased: Time, secondary: Time) -> u32 {
        let (_, latest) = self.time_range;
        let n = ((latest - aliased + secondary) / self.period).floor();
        if n.is_finite() && n > 0.0 {
            n as u32
        } else {
            0
        }
    }

    /// Unwrap one event
    ///
    /// Tries offsets `n = 0, 1, ...` and returns the first whose sample time
    /// `aliased + n·T - secondary` cuts a transmitted region. `None` means the
    /// event is inconsistent with the chopper cascade.
    pub fn unwrap_event(&self, aliased: Time, secondary: Time) -> Option<Unwrapped> {
        if !(aliased.is_finite() && secondary.is_finite()) {
            return None;
        }

        (0..=self.max_offset(aliased, secondary)).find_map(|n| {
            let unwrapped_time = aliased + self.period * n as f64;
            let sample_time = unwrapped_time - secondary;
            let t = sample_time.value();

            let (lo, hi) = self
                .regions
                .iter()
                .filter(|region| region.spans(t))
                .find_map(|region| region.chord_at(t))?;

            let slowness = Slowness::new(0.5 * (lo + hi));
            let primary_flight_time = self.distance * slowness;

            Some(Unwrapped {
                offset: n,
                unwrapped_time,
                sample_time,
                departure_time: sample_time - primary_flight_time,
                primary_flight_time,
                slowness,
                incident_energy: Energy::from_slowness(slowness),
            })
        })
    }
}

/// Clip one region by every opening of a chopper it can meet
fn transmit(region: &Polygon, chopper: &Chopper, lead: f64) -> Vec<Polygon> {
    let Some((earliest, latest)) = region.projected_range(lead) else {
        return Vec::new();
    };

    chopper
        .openings(Time::new(earliest), Time::new(latest))
        .into_iter()
        .map(|(open, close)| region.clip_band(open.value(), close.value(), lead))
        .filter(|clipped| !clipped.is_empty())
        .collect()
}

/// Choppers must be ordered, upstream of the sample and phase-locked
fn check_cascade(source: &Source, choppers: &[Chopper], sample_distance: Length) -> Result<()> {
    let invalid = |chopper: &Chopper, reason: String| Error::InvalidChopper {
        name: chopper.name().to_string(),
        reason,
    };

    for chopper in choppers {
        if chopper.distance() >= sample_distance {
            return Err(invalid(chopper, "chopper is not upstream of the sample".to_string()));
        }

        let multiple = chopper
            .frequency()
            .value()
            .multiple_of(source.frequency().value(), PHASE_LOCK_TOLERANCE);
        if multiple.is_none() {
            return Err(invalid(
                chopper,
                f!(
                    "frequency {} Hz is not a multiple of the source frequency {} Hz",
                    chopper.frequency().value(),
                    source.frequency().value()
                ),
            ));
        }
    }

    let distances: Vec<f64> = choppers.iter().map(|c| c.distance().value()).collect();
    if !distances.is_ascending() {
        return Err(Error::InvalidChopper {
            name: choppers.iter().map(|c| c.name()).join(", "),
            reason: "choppers must be listed in beam order".to_string(),
        });
    }

    Ok(())
}
