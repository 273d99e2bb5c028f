//! Rotating disc choppers

use std::f64::consts::TAU;

use bifrost_units::{Frequency, Length, Time};

use crate::error::{Error, Result};

/// A rotating disc with angular openings
///
/// The disc turns at `frequency` revolutions per second. At time `t` the beam
/// sits at disc angle `2π·f·t - phase`, so a window spanning `[a, b]` radians
/// is open for `t ∈ [(a + phase)/ω, (b + phase)/ω]` in every revolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Chopper {
    name: String,
    frequency: Frequency,
    phase: f64,
    windows: Vec<(f64, f64)>,
    distance: Length,
}

impl Chopper {
    /// Create a validated chopper
    ///
    /// - `frequency` - rotation frequency, must be > 0
    /// - `phase` - angular phase offset (radians)
    /// - `windows` - angular openings `(start, end)` in radians, each narrower
    ///   than a full turn
    /// - `distance` - distance from the source along the beam, must be > 0
    pub fn new(
        name: impl Into<String>,
        frequency: Frequency,
        phase: f64,
        windows: Vec<(f64, f64)>,
        distance: Length,
    ) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: &str| Error::InvalidChopper {
            name: name.clone(),
            reason: reason.to_string(),
        };

        if !(frequency.is_finite() && frequency > Frequency::ZERO) {
            return Err(invalid("frequency must be positive"));
        }
        if !phase.is_finite() {
            return Err(invalid("phase must be finite"));
        }
        if !(distance.is_finite() && distance > Length::ZERO) {
            return Err(invalid("distance from the source must be positive"));
        }
        if windows.is_empty() {
            return Err(invalid("at least one opening is required"));
        }
        for (start, end) in &windows {
            if !(start.is_finite() && end.is_finite() && start < end) {
                return Err(invalid("openings must have start < end"));
            }
            if end - start >= TAU {
                return Err(invalid("openings must be narrower than a full turn"));
            }
        }

        Ok(Self {
            name,
            frequency,
            phase,
            windows,
            distance,
        })
    }

    /// Same as [Chopper::new()] but with angles in degrees
    pub fn from_degrees(
        name: impl Into<String>,
        frequency: Frequency,
        phase: f64,
        windows: &[(f64, f64)],
        distance: Length,
    ) -> Result<Self> {
        let windows = windows
            .iter()
            .map(|(a, b)| (a.to_radians(), b.to_radians()))
            .collect();
        Self::new(name, frequency, phase.to_radians(), windows, distance)
    }

    /// Descriptive name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rotation frequency
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Angular phase offset (radians)
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Angular openings (radians)
    pub fn windows(&self) -> &[(f64, f64)] {
        &self.windows
    }

    /// Distance from the source
    pub fn distance(&self) -> Length {
        self.distance
    }

    /// Time for one revolution
    pub fn period(&self) -> Time {
        self.frequency.period()
    }

    /// Opening intervals in the first revolution, one per window
    pub fn base_openings(&self) -> Vec<(Time, Time)> {
        let omega = TAU * self.frequency.value();
        self.windows
            .iter()
            .map(|(a, b)| {
                (
                    Time::new((a + self.phase) / omega),
                    Time::new((b + self.phase) / omega),
                )
            })
            .collect()
    }

    /// Every opening interval that overlaps `[from, to]`, sorted by opening time
    ///
    /// ```rust
    /// # use bifrost_primary::Chopper;
    /// # use bifrost_units::{Frequency, Length, Time};
    /// let width = 2.0 * std::f64::consts::PI * 10.0 * 5e-3;
    /// let chopper = Chopper::new("c", Frequency::new(10.0), 0.0, vec![(0.0, width)], Length::new(5.0)).unwrap();
    ///
    /// // open for 5 ms every 100 ms
    /// let openings = chopper.openings(Time::from_millis(50.0), Time::from_millis(250.0));
    /// assert_eq!(openings.len(), 2);
    /// assert!((openings[0].0.as_millis() - 100.0).abs() < 1e-9);
    /// ```
    pub fn openings(&self, from: Time, to: Time) -> Vec<(Time, Time)> {
        let period = self.period();
        let mut openings = Vec::new();

        for (open, close) in self.base_openings() {
            let first = ((from - close) / period).floor() as i64;
            let last = ((to - open) / period).ceil() as i64;
            for k in first..=last {
                let shift = period * k as f64;
                let (o, c) = (open + shift, close + shift);
                if c >= from && o <= to {
                    openings.push((o, c));
                }
            }
        }

        openings.sort_by(|a, b| a.0.value().total_cmp(&b.0.value()));
        openings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn degrees_convert_to_radians() {
        let chopper = Chopper::from_degrees(
            "band",
            Frequency::new(14.0),
            90.0,
            &[(0.0, 180.0)],
            Length::new(8.0),
        )
        .unwrap();
        assert!((chopper.phase() - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((chopper.windows()[0].1 - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn phase_delays_the_opening() {
        let quarter = std::f64::consts::FRAC_PI_2;
        let chopper = Chopper::new("c", Frequency::new(10.0), quarter, vec![(0.0, 0.1)], Length::new(1.0)).unwrap();
        let (open, _) = chopper.base_openings()[0];
        assert!((open.as_millis() - 25.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(Frequency::ZERO, vec![(0.0, 0.1)], 1.0)]
    #[case(Frequency::new(14.0), vec![], 1.0)]
    #[case(Frequency::new(14.0), vec![(0.2, 0.1)], 1.0)]
    #[case(Frequency::new(14.0), vec![(0.0, 7.0)], 1.0)]
    #[case(Frequency::new(14.0), vec![(0.0, 0.1)], 0.0)]
    fn rejects_invalid_parameters(
        #[case] frequency: Frequency,
        #[case] windows: Vec<(f64, f64)>,
        #[case] distance: f64,
    ) {
        let result = Chopper::new("bad", frequency, 0.0, windows, Length::new(distance));
        assert!(matches!(result, Err(Error::InvalidChopper { .. })));
    }
}
