//! Bragg's law for the analyzer reflection
//!
//! Analyzers are set up to reflect in the backscattering condition, so for
//! reflection order n from planes of spacing d:
//!
//! ```text
//!     n λ = 2 d    =>    k = n π / d
//! ```
//!
//! The order is fixed to the first reflection; higher orders are removed by
//! filters on real instruments. The glancing angle of the incoming leg on the
//! planes is reported for diagnostics only and never changes the energy.

use std::f64::consts::PI;

use bifrost_units::{Energy, Wavenumber};
use nalgebra::{Unit, Vector3};

/// Reflection order used in every calculation
pub const BRAGG_ORDER: u32 = 1;

/// Glancing angle (radians) of a ray on planes with the given normal
///
/// The angle between the ray and the planes themselves, so a ray along the
/// normal has θ = π/2. The sign of either vector does not matter.
///
/// ```rust
/// # use bifrost_secondary::bragg::glancing_angle;
/// # use nalgebra::{Unit, Vector3};
/// let normal = Unit::new_normalize(Vector3::z());
/// let theta = glancing_angle(&Vector3::new(1.0, 0.0, -1.0), &normal);
/// assert!((theta - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
/// ```
pub fn glancing_angle(ray: &Vector3<f64>, normal: &Unit<Vector3<f64>>) -> f64 {
    let sin_theta = (ray.normalize().dot(normal)).abs().min(1.0);
    sin_theta.asin()
}

/// Wavevector magnitude reflected by planes of spacing `d_spacing` (Å)
///
/// ```rust
/// # use bifrost_secondary::bragg::final_wavevector;
/// let k = final_wavevector(3.355);
/// assert!((k.value() - std::f64::consts::PI / 3.355).abs() < 1e-12);
/// ```
pub fn final_wavevector(d_spacing: f64) -> Wavenumber {
    Wavenumber::new(BRAGG_ORDER as f64 * PI / d_spacing)
}

/// Energy reflected by planes of spacing `d_spacing` (Å)
pub fn final_energy(d_spacing: f64) -> Energy {
    Energy::from_wavenumber(final_wavevector(d_spacing))
}

/// Lattice spacing (Å) that reflects wavevector `k`
///
/// Inverse of [final_wavevector()].
pub fn d_spacing_for(k: Wavenumber) -> f64 {
    BRAGG_ORDER as f64 * PI / k.value()
}

/// Lattice spacing (Å) that reflects energy `e`
pub fn d_spacing_for_energy(e: Energy) -> f64 {
    d_spacing_for(Wavenumber::from_energy(e))
}
