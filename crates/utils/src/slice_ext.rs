use crate::error::{Error, Result};

/// Extends functionality for slices of float arrays
pub trait SliceExt {
    /// Find the minimum value in float arrays
    ///
    /// Only provides the minimum value from a collection of valid numbers. Any
    /// NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use bifrost_utils::SliceExt;
    /// # use bifrost_utils::Error;
    /// // Successful cases
    /// assert_eq!([1.1_f64, 0.5, 2.2].try_min(), Ok(0.5));
    ///
    /// // Error cases
    /// assert_eq!([1.1_f64, f64::NAN, 2.2].try_min(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!(Vec::<f64>::new().try_min(), Err(Error::SliceContainsNoValues));
    /// ```
    ///
    /// The float primitives do not implement `Ord` due to `NaN` being
    /// incomparable, so this uses `total_cmp` once the values are known to be
    /// finite.
    fn try_min(&self) -> Result<f64>;

    /// Find the maximum value in float arrays
    ///
    /// Same rules as [SliceExt::try_min()].
    ///
    /// ```rust
    /// # use bifrost_utils::SliceExt;
    /// assert_eq!([1.1_f64, 0.5, 2.2].try_max(), Ok(2.2));
    /// ```
    fn try_max(&self) -> Result<f64>;

    /// Both the minimum and maximum as a `(min, max)` tuple
    ///
    /// ```rust
    /// # use bifrost_utils::SliceExt;
    /// assert_eq!([3.0_f64, -1.0, 2.0].try_range(), Ok((-1.0, 3.0)));
    /// ```
    fn try_range(&self) -> Result<(f64, f64)>;

    /// True if every value is greater than or equal to the one before it
    ///
    /// Empty and single-value slices are trivially ascending.
    ///
    /// ```rust
    /// # use bifrost_utils::SliceExt;
    /// assert!([6.0_f64, 8.5, 8.5, 28.0].is_ascending());
    /// assert!(![6.0_f64, 28.0, 8.5].is_ascending());
    /// ```
    fn is_ascending(&self) -> bool;
}

impl SliceExt for [f64] {
    fn try_min(&self) -> Result<f64> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        self.iter()
            .min_by(|a, b| a.total_cmp(b))
            .copied()
            .ok_or(Error::SliceContainsNoValues)
    }

    fn try_max(&self) -> Result<f64> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        self.iter()
            .max_by(|a, b| a.total_cmp(b))
            .copied()
            .ok_or(Error::SliceContainsNoValues)
    }

    fn try_range(&self) -> Result<(f64, f64)> {
        Ok((self.try_min()?, self.try_max()?))
    }

    fn is_ascending(&self) -> bool {
        self.windows(2).all(|w| w[0] <= w[1])
    }
}
