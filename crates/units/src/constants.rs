//! Physical constants and unit conversion factors (CODATA 2018, SI)

/// Neutron rest mass (kg)
pub const NEUTRON_MASS: f64 = 1.674_927_498_04e-27;

/// Reduced Planck constant (J s)
pub const HBAR: f64 = 1.054_571_817e-34;

/// One milli-electronvolt (J)
pub const MEV: f64 = 1.602_176_634e-22;

/// One Ångström (m)
pub const ANGSTROM: f64 = 1e-10;

/// ħ²/2mₙ expressed in meV Å², the factor in E = ħ²k²/2mₙ
///
/// Approximately 2.0721 meV Å².
pub const HBAR_SQ_OVER_2M: f64 = HBAR * HBAR / (2.0 * NEUTRON_MASS) / MEV / (ANGSTROM * ANGSTROM);

/// ħ/mₙ expressed in m/s per Å⁻¹, the factor in v = ħk/mₙ
///
/// Approximately 629.6 m/s per Å⁻¹.
pub const HBAR_OVER_M: f64 = HBAR / NEUTRON_MASS / ANGSTROM;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_factors() {
        assert!((HBAR_SQ_OVER_2M - 2.072_124).abs() < 1e-5);
        assert!((HBAR_OVER_M - 629.622).abs() < 1e-2);
    }
}
