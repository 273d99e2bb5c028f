use crate::f;

/// Extends `f64` with formatting and comparison helpers
pub trait ValueExt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition of the precision and the exponent padding.
    ///
    /// ```rust
    /// # use bifrost_utils::ValueExt;
    /// let number = -1.0_f64;
    /// assert_eq!(number.sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!(0.0714_f64.sci(3, 2), "7.140e-02".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Compare two values within a relative tolerance
    ///
    /// The tolerance is relative to the larger magnitude of the two values.
    /// Exactly equal values always compare equal, including zeros.
    ///
    /// ```rust
    /// # use bifrost_utils::ValueExt;
    /// assert!(1.0_f64.approx_eq(1.0 + 1e-12, 1e-9));
    /// assert!(!1.0_f64.approx_eq(1.001, 1e-9));
    /// assert!(0.0_f64.approx_eq(0.0, 1e-9));
    /// ```
    fn approx_eq(&self, other: f64, rel_tol: f64) -> bool;

    /// Nearest integer multiple of `base`, if within a relative tolerance
    ///
    /// Used to check phase locking, e.g. a 28 Hz chopper on a 14 Hz source.
    ///
    /// ```rust
    /// # use bifrost_utils::ValueExt;
    /// assert_eq!(28.0_f64.multiple_of(14.0, 1e-9), Some(2));
    /// assert_eq!(21.0_f64.multiple_of(14.0, 1e-9), None);
    /// ```
    fn multiple_of(&self, base: f64, rel_tol: f64) -> Option<u64>;
}

impl ValueExt for f64 {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // `{:e}` formatting always yields an exponent
        let split = num.find('e').unwrap_or(num.len());
        let exp = num.split_off(split);
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', exp.get(1..).unwrap_or("0")),
        };
        // Pad the exponent with zeros if needed and put it back on the number
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }

    fn approx_eq(&self, other: f64, rel_tol: f64) -> bool {
        if *self == other {
            return true;
        }
        let scale = self.abs().max(other.abs());
        (self - other).abs() <= rel_tol * scale
    }

    fn multiple_of(&self, base: f64, rel_tol: f64) -> Option<u64> {
        if base <= 0.0 || !self.is_finite() || *self <= 0.0 {
            return None;
        }
        let ratio = (self / base).round();
        if ratio >= 1.0 && (ratio * base).approx_eq(*self, rel_tol) {
            Some(ratio as u64)
        } else {
            None
        }
    }
}
