//! Analyzer crystals

use nalgebra::{Rotation3, Unit, Vector3};

use crate::error::{Error, Result};

/// Identifier of an analyzer crystal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnalyzerId(pub u32);

impl std::fmt::Display for AnalyzerId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A positioned analyzer crystal
///
/// The orientation rotates the crystal's local frame into the lab frame. In
/// the local frame the reflecting lattice planes are normal to the z axis.
///
/// ```rust
/// # use bifrost_secondary::{Analyzer, AnalyzerId};
/// # use nalgebra::{Rotation3, Vector3};
/// // Pyrolytic graphite (002) has d = 3.355 Å
/// let analyzer = Analyzer::new(
///     AnalyzerId(0),
///     Vector3::new(0.0, 0.0, 1.0),
///     Rotation3::identity(),
///     3.355,
/// ).unwrap();
///
/// assert_eq!(analyzer.plane_normal().into_inner(), Vector3::z());
///
/// // lattice spacings must be positive
/// assert!(Analyzer::new(AnalyzerId(1), Vector3::zeros(), Rotation3::identity(), 0.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Analyzer {
    id: AnalyzerId,
    position: Vector3<f64>,
    orientation: Rotation3<f64>,
    d_spacing: f64,
}

impl Analyzer {
    /// Create a validated analyzer
    ///
    /// - `position` - centre of the crystal in the lab frame (m)
    /// - `orientation` - rotation from the crystal frame into the lab frame
    /// - `d_spacing` - lattice plane spacing (Å), must be finite and > 0
    pub fn new(
        id: AnalyzerId,
        position: Vector3<f64>,
        orientation: Rotation3<f64>,
        d_spacing: f64,
    ) -> Result<Self> {
        if !(d_spacing.is_finite() && d_spacing > 0.0) {
            return Err(Error::NonPositiveDSpacing {
                analyzer: id,
                d_spacing,
            });
        }

        Ok(Self {
            id,
            position,
            orientation,
            d_spacing,
        })
    }

    /// Identifier of the analyzer
    pub fn id(&self) -> AnalyzerId {
        self.id
    }

    /// Centre of the crystal in the lab frame (m)
    pub fn position(&self) -> &Vector3<f64> {
        &self.position
    }

    /// Rotation from the crystal frame into the lab frame
    pub fn orientation(&self) -> &Rotation3<f64> {
        &self.orientation
    }

    /// Lattice plane spacing (Å)
    pub fn d_spacing(&self) -> f64 {
        self.d_spacing
    }

    /// Unit normal of the reflecting planes in the lab frame
    pub fn plane_normal(&self) -> Unit<Vector3<f64>> {
        Unit::new_normalize(self.orientation * Vector3::z())
    }
}
