//! Convex polygons in the (time, slowness) plane
//!
//! Vertices are stored as `Point2` with `x` the time (s) and `y` the slowness
//! (s/m). Every polygon built here is convex, and clipping a convex polygon by
//! a half-plane keeps it convex, so the Sutherland–Hodgman algorithm is exact.

use itertools::Itertools;
use nalgebra::Point2;

/// Areas below this are treated as empty (s²/m)
const MIN_AREA: f64 = 1e-18;

/// A convex polygon in phase space
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point2<f64>>,
}

impl Polygon {
    /// Polygon from vertices in order around the boundary
    pub fn new(vertices: Vec<Point2<f64>>) -> Self {
        Self { vertices }
    }

    /// Parallelogram swept by emission times `[t0, t1]` and slownesses `[s0, s1]`
    ///
    /// A neutron leaving at `t` with slowness `s` is seen `distance·s` later,
    /// which shears the rectangle of the pulse into a parallelogram.
    pub fn sheared_pulse(t0: f64, t1: f64, s0: f64, s1: f64, distance: f64) -> Self {
        Self::new(vec![
            Point2::new(t0 + distance * s0, s0),
            Point2::new(t1 + distance * s0, s0),
            Point2::new(t1 + distance * s1, s1),
            Point2::new(t0 + distance * s1, s1),
        ])
    }

    /// Vertices in boundary order
    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    /// Enclosed area (shoelace formula)
    ///
    /// ```rust
    /// # use bifrost_primary::polygon::Polygon;
    /// let square = Polygon::sheared_pulse(0.0, 2.0, 0.0, 2.0, 0.0);
    /// assert_eq!(square.area(), 4.0);
    /// ```
    pub fn area(&self) -> f64 {
        let twice: f64 = self
            .vertices
            .iter()
            .circular_tuple_windows()
            .map(|(p, q)| p.x * q.y - q.x * p.y)
            .sum();
        0.5 * twice.abs()
    }

    /// True if the polygon encloses no area
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3 || self.area() < MIN_AREA
    }

    /// Keep the part where `a·t + b·s + c >= 0`
    pub fn clip(&self, a: f64, b: f64, c: f64) -> Self {
        let side = |p: &Point2<f64>| a * p.x + b * p.y + c;
        let mut clipped = Vec::with_capacity(self.vertices.len() + 1);

        for (p, q) in self.vertices.iter().circular_tuple_windows() {
            let (fp, fq) = (side(p), side(q));
            if fp >= 0.0 {
                clipped.push(*p);
            }
            if (fp >= 0.0) != (fq >= 0.0) {
                let r = fp / (fp - fq);
                clipped.push(Point2::new(p.x + r * (q.x - p.x), p.y + r * (q.y - p.y)));
            }
        }

        Self::new(clipped)
    }

    /// Keep the part seen between `open` and `close` at a position `lead`
    /// metres upstream of the reference, where the time is `t - lead·s`
    pub fn clip_band(&self, open: f64, close: f64, lead: f64) -> Self {
        self.clip(1.0, -lead, -open).clip(-1.0, lead, close)
    }

    /// Range of `t - lead·s` over the polygon
    pub fn projected_range(&self, lead: f64) -> Option<(f64, f64)> {
        self.vertices
            .iter()
            .map(|p| p.x - lead * p.y)
            .minmax_by(|a, b| a.total_cmp(b))
            .into_option()
    }

    /// Time range covered by the polygon
    pub fn time_range(&self) -> Option<(f64, f64)> {
        self.projected_range(0.0)
    }

    /// Slowness range covered by the polygon
    pub fn slowness_range(&self) -> Option<(f64, f64)> {
        self.vertices
            .iter()
            .map(|p| p.y)
            .minmax_by(|a, b| a.total_cmp(b))
            .into_option()
    }

    /// Slowness interval where the vertical line at time `t` cuts the polygon
    ///
    /// ```rust
    /// # use bifrost_primary::polygon::Polygon;
    /// let pulse = Polygon::sheared_pulse(0.0, 1.0, 0.0, 1.0, 1.0);
    /// let (lo, hi) = pulse.chord_at(1.0).unwrap();
    /// assert!((lo - 0.0).abs() < 1e-12 && (hi - 1.0).abs() < 1e-12);
    /// assert!(pulse.chord_at(3.0).is_none());
    /// ```
    pub fn chord_at(&self, t: f64) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }

        self.vertices
            .iter()
            .circular_tuple_windows()
            .flat_map(|(p, q)| {
                if p.x == q.x {
                    // vertical edge contributes both ends
                    if p.x == t {
                        vec![p.y, q.y]
                    } else {
                        vec![]
                    }
                } else if (p.x - t) * (q.x - t) <= 0.0 {
                    let r = (t - p.x) / (q.x - p.x);
                    vec![p.y + r * (q.y - p.y)]
                } else {
                    vec![]
                }
            })
            .minmax_by(|a, b| a.total_cmp(b))
            .into_option()
    }

    /// True if time `t` falls within the polygon's time range
    pub fn spans(&self, t: f64) -> bool {
        self.time_range().is_some_and(|(lo, hi)| lo <= t && t <= hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Polygon {
        Polygon::sheared_pulse(0.0, 1.0, 0.0, 1.0, 0.0)
    }

    #[test]
    fn clip_halves_the_square() {
        let half = unit_square().clip(-1.0, 0.0, 0.5);
        assert!((half.area() - 0.5).abs() < 1e-12);
        assert_eq!(half.time_range(), Some((0.0, 0.5)));
    }

    #[test]
    fn clip_outside_is_empty() {
        let none = unit_square().clip(1.0, 0.0, -2.0);
        assert!(none.is_empty());
        assert_eq!(none.time_range(), None);
    }

    #[test]
    fn band_along_the_diagonal() {
        // t - s in [0, 0.2]
        let band = unit_square().clip_band(0.0, 0.2, 1.0);
        assert!((band.area() - (0.5 - 0.5 * 0.8 * 0.8)).abs() < 1e-12);
        let (lo, hi) = band.chord_at(0.5).unwrap();
        assert!((lo - 0.3).abs() < 1e-12);
        assert!((hi - 0.5).abs() < 1e-12);
    }

    #[test]
    fn projected_range_of_sheared_pulse() {
        let pulse = Polygon::sheared_pulse(1.0, 2.0, 0.5, 1.5, 10.0);
        let (lo, hi) = pulse.projected_range(10.0).unwrap();
        assert!((lo - 1.0).abs() < 1e-12);
        assert!((hi - 2.0).abs() < 1e-12);
        assert!(pulse.spans(7.0) && !pulse.spans(0.5));
    }
}
