//! The egg silhouette that gets revolved into the device body.
//!
//! For θ from 0° to 180° the profile point is
//!
//! ```text
//! x(θ) = (apex·cos θ + girth)·sin θ
//! y(θ) = −cos θ
//! ```
//!
//! so the curve starts on the axis at the bottom pole `(0, −1)`, bulges out to roughly
//! `girth` at the equator and returns to the axis at the top pole `(0, 1)`. With
//! `apex = 0` it is a circle of radius `girth` (a sphere once revolved); a positive apex
//! fattens the lower half and sharpens the upper one.

use crate::float_types::{PI, Real};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A `(radius, height)` sample of the silhouette
pub type ProfilePoint = Point2<Real>;

/// Angular sampling of the half revolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResolution {
    /// Requested angular step in degrees. Steps that do not divide 180° evenly are
    /// rounded to the nearest step that does, so both poles are always sampled.
    pub step_degrees: Real,
}

impl ProfileResolution {
    /// 6° steps, 31 samples
    pub const STANDARD: ProfileResolution = ProfileResolution { step_degrees: 6.0 };
    /// 2° steps, 91 samples
    pub const HIGH_DETAIL: ProfileResolution = ProfileResolution { step_degrees: 2.0 };

    /// Number of intervals between 0° and 180°
    pub fn intervals(&self) -> usize {
        if !(self.step_degrees.is_finite() && self.step_degrees > 0.0) {
            tracing::warn!(
                step = self.step_degrees,
                "invalid profile step, using {}°",
                Self::STANDARD.step_degrees
            );
            return Self::STANDARD.intervals();
        }
        ((180.0 / self.step_degrees).round() as usize).max(1)
    }

    /// Number of profile points produced at this resolution
    pub fn sample_count(&self) -> usize {
        self.intervals() + 1
    }
}

impl Default for ProfileResolution {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Sampled egg silhouette, bottom pole first. Regenerated wholesale whenever a shape
/// knob changes.
#[derive(Clone, Debug, PartialEq)]
pub struct Profile {
    pub points: Vec<ProfilePoint>,
}

impl Profile {
    /// Sample the silhouette for `girth` and `apex`.
    ///
    /// Nothing is validated: a zero or negative girth simply gives a degenerate outline.
    pub fn egg(girth: Real, apex: Real, resolution: ProfileResolution) -> Profile {
        if girth <= 0.0 || apex < 0.0 {
            tracing::warn!(girth, apex, "degenerate egg profile parameters");
        }

        let intervals = resolution.intervals();
        let points = (0..=intervals)
            .map(|i| {
                // the poles are pinned so they sit exactly on the axis
                let (sin, cos) = match i {
                    0 => (0.0, 1.0),
                    i if i == intervals => (0.0, -1.0),
                    _ => (PI * i as Real / intervals as Real).sin_cos(),
                };
                Point2::new((apex * cos + girth) * sin, -cos)
            })
            .collect();

        Profile { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Profile point sampled at `degrees`, if that angle lies on the sampling grid
    pub fn at_degrees(&self, degrees: Real) -> Option<ProfilePoint> {
        let intervals = self.points.len().checked_sub(1)?;
        let index = degrees / 180.0 * intervals as Real;
        if (index - index.round()).abs() > 1e-6 || index < 0.0 {
            return None;
        }
        self.points.get(index.round() as usize).copied()
    }

    /// Widest radius of the silhouette
    pub fn max_radius(&self) -> Real {
        self.points.iter().map(|p| p.x).fold(0.0, Real::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_resolution_has_31_points() {
        let profile = Profile::egg(0.8, 0.15, ProfileResolution::STANDARD);
        assert_eq!(profile.len(), 31);
        assert_eq!(ProfileResolution::HIGH_DETAIL.sample_count(), 91);
    }

    #[test]
    fn reference_points() {
        let profile = Profile::egg(0.8, 0.15, ProfileResolution::STANDARD);
        let bottom = profile.at_degrees(0.0).unwrap();
        let equator = profile.at_degrees(90.0).unwrap();
        let top = profile.at_degrees(180.0).unwrap();

        assert_eq!(bottom, Point2::new(0.0, -1.0));
        assert_eq!(top, Point2::new(0.0, 1.0));
        assert!((equator.x - 0.8).abs() < 1e-12);
        assert!(equator.y.abs() < 1e-12);
    }

    #[test]
    fn zero_apex_is_a_circle() {
        let profile = Profile::egg(1.0, 0.0, ProfileResolution::STANDARD);
        for p in &profile.points {
            assert!((p.coords.norm() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn point_count_ignores_shape_knobs() {
        let counts: Vec<usize> = [(0.8, 0.15), (2.0, 0.0), (0.0, 2.0), (-1.0, 5.0)]
            .iter()
            .map(|&(g, a)| Profile::egg(g, a, ProfileResolution::STANDARD).len())
            .collect();
        assert!(counts.iter().all(|&c| c == 31));
    }

    #[test]
    fn uneven_step_still_reaches_both_poles() {
        let profile = Profile::egg(0.8, 0.15, ProfileResolution { step_degrees: 7.0 });
        assert_eq!(profile.len(), 27);
        assert_eq!(profile.points[0].y, -1.0);
        assert_eq!(profile.points[26].y, 1.0);
        assert_eq!(profile.points[26].x, 0.0);
    }

    #[test]
    fn off_grid_angle_is_none() {
        let profile = Profile::egg(0.8, 0.15, ProfileResolution::STANDARD);
        assert!(profile.at_degrees(7.0).is_none());
        assert!(profile.at_degrees(186.0).is_none());
    }

    #[test]
    fn invalid_step_falls_back() {
        let resolution = ProfileResolution { step_degrees: 0.0 };
        assert_eq!(resolution.sample_count(), 31);
    }
}
