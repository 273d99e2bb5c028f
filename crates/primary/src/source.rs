//! Pulsed neutron source

use bifrost_units::{Frequency, Slowness, Time, Wavelength};

use crate::error::{Error, Result};

/// A periodic pulsed source
///
/// Pulse 0 starts at `delay` and lasts `duration`. Every later pulse is the
/// same pulse shifted by whole periods. Neutrons leave with any slowness in
/// the emitted band.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    frequency: Frequency,
    delay: Time,
    duration: Time,
    slowness: (Slowness, Slowness),
}

impl Source {
    /// Create a validated source
    ///
    /// - `frequency` - repetition rate, must be > 0
    /// - `delay` - emission start of pulse 0 relative to the timing signal
    /// - `duration` - pulse length, must be > 0 and shorter than a period
    /// - `fastest`, `slowest` - slowness band emitted, 0 < fastest < slowest
    pub fn new(
        frequency: Frequency,
        delay: Time,
        duration: Time,
        fastest: Slowness,
        slowest: Slowness,
    ) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidSource {
            reason: reason.to_string(),
        };

        if !(frequency.is_finite() && frequency > Frequency::ZERO) {
            return Err(invalid("repetition frequency must be positive"));
        }
        if !delay.is_finite() {
            return Err(invalid("emission delay must be finite"));
        }
        if !(duration.is_finite() && duration > Time::ZERO) {
            return Err(invalid("pulse duration must be positive"));
        }
        if duration >= frequency.period() {
            return Err(invalid("pulse duration must be shorter than the period"));
        }
        if !(fastest.is_finite() && slowest.is_finite() && fastest > Slowness::ZERO) {
            return Err(invalid("slowness band must be positive"));
        }
        if fastest >= slowest {
            return Err(invalid("slowness band is empty"));
        }

        Ok(Self {
            frequency,
            delay,
            duration,
            slowness: (fastest, slowest),
        })
    }

    /// Source emitting the wavelength band `[shortest, longest]`
    pub fn from_wavelengths(
        frequency: Frequency,
        delay: Time,
        duration: Time,
        shortest: Wavelength,
        longest: Wavelength,
    ) -> Result<Self> {
        Self::new(
            frequency,
            delay,
            duration,
            Slowness::from_wavelength(shortest),
            Slowness::from_wavelength(longest),
        )
    }

    /// Repetition frequency
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Time between pulses
    pub fn period(&self) -> Time {
        self.frequency.period()
    }

    /// Emission start of pulse 0
    pub fn delay(&self) -> Time {
        self.delay
    }

    /// Pulse length
    pub fn duration(&self) -> Time {
        self.duration
    }

    /// Smallest emitted slowness (fastest neutrons)
    pub fn fastest(&self) -> Slowness {
        self.slowness.0
    }

    /// Largest emitted slowness (slowest neutrons)
    pub fn slowest(&self) -> Slowness {
        self.slowness.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ess() -> Result<Source> {
        Source::from_wavelengths(
            Frequency::new(14.0),
            Time::ZERO,
            Time::from_millis(2.86),
            Wavelength::new(1.0),
            Wavelength::new(6.0),
        )
    }

    #[test]
    fn wavelength_band_orders_slowness() {
        let source = ess().unwrap();
        assert!(source.fastest() < source.slowest());
        assert!((source.period().as_millis() - 1000.0 / 14.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_unphysical_pulses() {
        let too_long = Source::new(
            Frequency::new(14.0),
            Time::ZERO,
            Time::from_millis(80.0),
            Slowness::new(1e-4),
            Slowness::new(1e-3),
        );
        assert!(matches!(too_long, Err(Error::InvalidSource { .. })));

        let inverted = Source::new(
            Frequency::new(14.0),
            Time::ZERO,
            Time::from_millis(2.0),
            Slowness::new(1e-3),
            Slowness::new(1e-4),
        );
        assert!(matches!(inverted, Err(Error::InvalidSource { .. })));

        let stopped = Source::new(
            Frequency::ZERO,
            Time::ZERO,
            Time::from_millis(2.0),
            Slowness::new(1e-4),
            Slowness::new(1e-3),
        );
        assert!(matches!(stopped, Err(Error::InvalidSource { .. })));
    }
}
