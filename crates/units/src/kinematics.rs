//! Neutron kinematics: energy, wavenumber, wavelength, velocity and slowness
//!
//! All relations are the non-relativistic ones, E = ħ²k²/2mₙ = mₙv²/2 and
//! v = ħk/mₙ, with the factors from [constants](crate::constants).

use std::f64::consts::PI;

use crate::constants::{HBAR_OVER_M, HBAR_SQ_OVER_2M};
use crate::quantity::{Energy, Slowness, Velocity, Wavelength, Wavenumber};

impl Energy {
    /// Kinetic energy of a neutron with wavevector magnitude `k`
    ///
    /// ```rust
    /// # use bifrost_units::{Energy, Wavenumber};
    /// let e = Energy::from_wavenumber(Wavenumber::new(1.0));
    /// assert!((e.value() - 2.0721).abs() < 1e-4);
    /// ```
    pub fn from_wavenumber(k: Wavenumber) -> Self {
        Energy::new(HBAR_SQ_OVER_2M * k.value() * k.value())
    }

    /// Kinetic energy of a neutron travelling at `v`
    pub fn from_velocity(v: Velocity) -> Self {
        Self::from_wavenumber(Wavenumber::from_velocity(v))
    }

    /// Kinetic energy of a neutron with slowness `s`
    pub fn from_slowness(s: Slowness) -> Self {
        Self::from_velocity(s.to_velocity())
    }
}

impl Wavenumber {
    /// Wavevector magnitude of a neutron with kinetic energy `e`
    ///
    /// Negative energies have no real wavevector and produce NaN.
    pub fn from_energy(e: Energy) -> Self {
        Wavenumber::new((e.value() / HBAR_SQ_OVER_2M).sqrt())
    }

    /// Wavevector magnitude of a neutron travelling at `v`
    pub fn from_velocity(v: Velocity) -> Self {
        Wavenumber::new(v.value() / HBAR_OVER_M)
    }

    /// Wavevector magnitude for wavelength `λ`, k = 2π/λ
    pub fn from_wavelength(lambda: Wavelength) -> Self {
        Wavenumber::new(2.0 * PI / lambda.value())
    }
}

impl Wavelength {
    /// Wavelength for wavevector magnitude `k`, λ = 2π/k
    pub fn from_wavenumber(k: Wavenumber) -> Self {
        Wavelength::new(2.0 * PI / k.value())
    }

    /// Wavelength of a neutron with kinetic energy `e`
    ///
    /// ```rust
    /// # use bifrost_units::{Energy, Wavelength};
    /// // 81.8 meV neutrons have a wavelength of ~1 Å
    /// let lambda = Wavelength::from_energy(Energy::new(81.804));
    /// assert!((lambda.value() - 1.0).abs() < 1e-4);
    /// ```
    pub fn from_energy(e: Energy) -> Self {
        Self::from_wavenumber(Wavenumber::from_energy(e))
    }
}

impl Velocity {
    /// Speed of a neutron with wavevector magnitude `k`
    pub fn from_wavenumber(k: Wavenumber) -> Self {
        Velocity::new(HBAR_OVER_M * k.value())
    }

    /// Speed of a neutron with kinetic energy `e`
    pub fn from_energy(e: Energy) -> Self {
        Self::from_wavenumber(Wavenumber::from_energy(e))
    }

    /// Speed of a neutron with wavelength `λ`
    pub fn from_wavelength(lambda: Wavelength) -> Self {
        Self::from_wavenumber(Wavenumber::from_wavelength(lambda))
    }
}

impl Slowness {
    /// Slowness of a neutron with kinetic energy `e`
    pub fn from_energy(e: Energy) -> Self {
        Velocity::from_energy(e).to_slowness()
    }

    /// Slowness of a neutron with wavelength `λ`
    ///
    /// Slowness is proportional to wavelength, so wavelength bands map to
    /// slowness bands directly.
    pub fn from_wavelength(lambda: Wavelength) -> Self {
        Velocity::from_wavelength(lambda).to_slowness()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[rstest]
    #[case(0.5)]
    #[case(2.7)]
    #[case(5.0)]
    #[case(81.8)]
    fn energy_velocity_consistency(#[case] mev: f64) {
        let e = Energy::new(mev);
        let via_k = Energy::from_wavenumber(Wavenumber::from_energy(e));
        let via_v = Energy::from_velocity(Velocity::from_energy(e));
        let via_s = Energy::from_slowness(Slowness::from_energy(e));
        assert!(rel(via_k.value(), mev) < 1e-12);
        assert!(rel(via_v.value(), mev) < 1e-12);
        assert!(rel(via_s.value(), mev) < 1e-12);
    }

    #[test]
    fn classical_kinetic_energy() {
        // E = m v^2 / 2 computed directly in SI units
        let v = 2200.0;
        let joules = 0.5 * crate::constants::NEUTRON_MASS * v * v;
        let expected = joules / crate::constants::MEV;
        assert!(rel(Energy::from_velocity(Velocity::new(v)).value(), expected) < 1e-12);
        // thermal neutrons at 2200 m/s are 25.3 meV
        assert!((expected - 25.3).abs() < 0.1);
    }

    #[test]
    fn wavelength_slowness_proportional() {
        let s1 = Slowness::from_wavelength(Wavelength::new(1.0));
        let s4 = Slowness::from_wavelength(Wavelength::new(4.0));
        assert!(rel(s4.value(), 4.0 * s1.value()) < 1e-12);
        // 1 Å neutrons travel at ~3956 m/s
        assert!((s1.to_velocity().value() - 3956.0).abs() < 1.0);
    }

    #[test]
    fn negative_energy_has_no_wavevector() {
        assert!(Wavenumber::from_energy(Energy::new(-1.0)).value().is_nan());
    }
}
