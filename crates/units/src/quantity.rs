//! Newtypes for scalar physical quantities

use std::fmt::{self, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Declares a unit-carrying `f64` newtype
///
/// Every quantity supports the operations that keep the dimension unchanged:
/// addition/subtraction with itself, scaling by a plain `f64`, and the ratio
/// of two values of the same kind (a dimensionless `f64`).
macro_rules! unit_type {
    ($(#[$meta:meta])* $name:ident, $unit:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
        #[repr(transparent)]
        pub struct $name(f64);

        impl $name {
            /// Zero of this quantity
            pub const ZERO: Self = Self(0.0);

            #[doc = concat!("Wrap a raw value expressed in ", $unit)]
            pub const fn new(value: f64) -> Self {
                Self(value)
            }

            #[doc = concat!("Raw value in ", $unit)]
            pub const fn value(self) -> f64 {
                self.0
            }

            /// Unit symbol used for display
            pub const fn unit() -> &'static str {
                $unit
            }

            /// True if the value is neither infinite nor NaN
            pub fn is_finite(self) -> bool {
                self.0.is_finite()
            }

            /// Absolute value
            pub fn abs(self) -> Self {
                Self(self.0.abs())
            }

            /// Smaller of two values
            pub fn min(self, other: Self) -> Self {
                Self(self.0.min(other.0))
            }

            /// Larger of two values
            pub fn max(self, other: Self) -> Self {
                Self(self.0.max(other.0))
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                if let Some(precision) = f.precision() {
                    write!(f, "{:.*} {}", precision, self.0, $unit)
                } else {
                    write!(f, "{} {}", self.0, $unit)
                }
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self(self.0 + rhs.0)
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, rhs: Self) {
                self.0 += rhs.0;
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self(self.0 - rhs.0)
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self(-self.0)
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self {
                Self(self.0 * rhs)
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;
            fn mul(self, rhs: $name) -> $name {
                $name(self * rhs.0)
            }
        }

        impl Div<f64> for $name {
            type Output = Self;
            fn div(self, rhs: f64) -> Self {
                Self(self.0 / rhs)
            }
        }

        impl Div for $name {
            type Output = f64;
            fn div(self, rhs: Self) -> f64 {
                self.0 / rhs.0
            }
        }

        impl Sum for $name {
            fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
                Self(iter.map(|v| v.0).sum())
            }
        }
    };
}

unit_type!(
    /// Neutron energy or energy transfer in meV
    Energy,
    "meV"
);

unit_type!(
    /// Wavevector magnitude in inverse Ångström
    Wavenumber,
    "1/Å"
);

unit_type!(
    /// Neutron wavelength in Ångström
    Wavelength,
    "Å"
);

unit_type!(
    /// Speed in m/s
    Velocity,
    "m/s"
);

unit_type!(
    /// Inverse velocity in s/m
    ///
    /// Ballistic flight time is linear in slowness, `t = L·s`, which is why the
    /// phase-space diagrams use it as the second axis instead of velocity.
    Slowness,
    "s/m"
);

unit_type!(
    /// Distance in metres
    Length,
    "m"
);

unit_type!(
    /// Time in seconds
    Time,
    "s"
);

unit_type!(
    /// Rotation or repetition frequency in Hz
    Frequency,
    "Hz"
);

// ! Dimension-changing operations

impl Div<Velocity> for Length {
    type Output = Time;
    fn div(self, rhs: Velocity) -> Time {
        Time(self.0 / rhs.0)
    }
}

impl Div<Time> for Length {
    type Output = Velocity;
    fn div(self, rhs: Time) -> Velocity {
        Velocity(self.0 / rhs.0)
    }
}

impl Mul<Slowness> for Length {
    type Output = Time;
    fn mul(self, rhs: Slowness) -> Time {
        Time(self.0 * rhs.0)
    }
}

impl Mul<Length> for Slowness {
    type Output = Time;
    fn mul(self, rhs: Length) -> Time {
        Time(self.0 * rhs.0)
    }
}

impl Div<Length> for Time {
    type Output = Slowness;
    fn div(self, rhs: Length) -> Slowness {
        Slowness(self.0 / rhs.0)
    }
}

impl Mul<Velocity> for Time {
    type Output = Length;
    fn mul(self, rhs: Velocity) -> Length {
        Length(self.0 * rhs.0)
    }
}

impl Mul<Frequency> for Time {
    type Output = f64;
    fn mul(self, rhs: Frequency) -> f64 {
        self.0 * rhs.0
    }
}

impl Velocity {
    /// Inverse of the velocity
    pub fn to_slowness(self) -> Slowness {
        Slowness(1.0 / self.0)
    }
}

impl Slowness {
    /// Inverse of the slowness
    pub fn to_velocity(self) -> Velocity {
        Velocity(1.0 / self.0)
    }
}

impl Frequency {
    /// Duration of one cycle
    ///
    /// ```rust
    /// # use bifrost_units::Frequency;
    /// let period = Frequency::new(14.0).period();
    /// assert!((period.value() - 0.071_428_571).abs() < 1e-9);
    /// ```
    pub fn period(self) -> Time {
        Time(1.0 / self.0)
    }
}

impl Time {
    /// Convenience constructor from milliseconds
    pub fn from_millis(ms: f64) -> Self {
        Self(ms * 1e-3)
    }

    /// Value in milliseconds
    pub fn as_millis(self) -> f64 {
        self.0 * 1e3
    }

    /// Non-negative remainder after division by `period`
    ///
    /// This is what acquisition electronics record: the time since the most
    /// recent pulse.
    ///
    /// ```rust
    /// # use bifrost_units::Time;
    /// let period = Time::from_millis(71.0);
    /// let aliased = Time::from_millis(76.0).rem_euclid(period);
    /// assert!((aliased.as_millis() - 5.0).abs() < 1e-9);
    /// ```
    pub fn rem_euclid(self, period: Time) -> Time {
        Time(self.0.rem_euclid(period.0))
    }
}
