//! Polar projection engine: ecliptic longitude → 2-D wheel point.
//!
//! All wheel elements (house cusps, sign labels, planet markers, aspect
//! endpoints) go through the same [`project`] call, so wraparound and
//! degenerate-input handling live in exactly one place.

use glam::{DVec2, dvec2};

use crate::errors::ChartDiagnostic;
use crate::tables::SIGN_SPAN_DEG;

/// Angle on the wheel for a longitude, measured from the reference
/// (usually the ascendant). Always non-negative, in [0,360), for any
/// finite input including negative longitudes.
pub fn wheel_angle(longitude: f64, reference: f64) -> f64 {
    ((longitude - reference) % 360.0 + 360.0) % 360.0
}

/// Projects an ecliptic longitude onto the wheel.
///
/// The reference longitude lands at angle 0, and a fixed −90° rotation
/// maps angle 0 to the top of the layout (ascendant-at-the-horizon
/// convention). Wraparound invariant: `project(l + 360.0, r, ..)`
/// equals `project(l, r, ..)` up to floating-point rounding, and
/// `project(r, r, ..)` is the same anchor point for every `r`.
pub fn project(longitude: f64, reference: f64, radius: f64, center: DVec2) -> DVec2 {
    let angle = wheel_angle(longitude, reference);
    let radians = (angle - 90.0).to_radians();
    center + radius * dvec2(radians.cos(), radians.sin())
}

/// Sign index (0..=11) for an absolute ecliptic angle in [0,360).
///
/// Floating-point edge effects at exact 360° boundaries can push the
/// derived index out of range; that comes back as a diagnostic carrying
/// the clamped index, so the caller can skip (or degrade) that one
/// element instead of failing the whole chart.
pub fn sign_index(angle: f64) -> Result<usize, ChartDiagnostic> {
    let index = (angle / SIGN_SPAN_DEG).floor() as i64;
    if (0..12).contains(&index) {
        Ok(index as usize)
    } else {
        Err(ChartDiagnostic::ProjectionOutOfRange { index, angle })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: DVec2, b: DVec2) -> bool {
        (a - b).length() < EPS
    }

    #[test]
    fn wheel_angle_is_always_in_range() {
        assert_eq!(wheel_angle(0.0, 0.0), 0.0);
        assert_eq!(wheel_angle(90.0, 0.0), 90.0);
        assert_eq!(wheel_angle(10.0, 350.0), 20.0);
        assert_eq!(wheel_angle(-30.0, 0.0), 330.0);
        for (longitude, reference) in [(719.5, 0.25), (-1000.0, 123.4), (359.999, 359.998)] {
            let angle = wheel_angle(longitude, reference);
            assert!((0.0..360.0).contains(&angle), "angle {angle} out of range");
        }
    }

    #[test]
    fn projection_is_wraparound_invariant() {
        let center = dvec2(250.0, 250.0);
        for (longitude, reference) in [(0.0, 0.0), (125.4, 58.0), (359.9, 0.1), (42.0, 300.0)] {
            let base = project(longitude, reference, 100.0, center);
            let wrapped = project(longitude + 360.0, reference, 100.0, center);
            assert!(close(base, wrapped), "{longitude}/{reference}: {base} vs {wrapped}");
        }
    }

    #[test]
    fn reference_always_projects_to_the_anchor() {
        let center = dvec2(250.0, 250.0);
        let anchor = project(0.0, 0.0, 100.0, center);
        // Angle 0 maps to the top of the layout.
        assert!(close(anchor, dvec2(250.0, 150.0)));
        for reference in [0.0, 17.3, 125.4, 270.0, 359.999] {
            let point = project(reference, reference, 100.0, center);
            assert!(close(point, anchor), "reference {reference} moved the anchor");
        }
    }

    #[test]
    fn quarter_turns_land_on_the_compass_points() {
        let center = dvec2(0.0, 0.0);
        assert!(close(project(90.0, 0.0, 1.0, center), dvec2(1.0, 0.0)));
        assert!(close(project(180.0, 0.0, 1.0, center), dvec2(0.0, 1.0)));
        assert!(close(project(270.0, 0.0, 1.0, center), dvec2(-1.0, 0.0)));
    }

    #[test]
    fn sign_index_covers_the_wheel_and_guards_the_boundary() {
        assert_eq!(sign_index(0.0), Ok(0));
        assert_eq!(sign_index(29.999), Ok(0));
        assert_eq!(sign_index(30.0), Ok(1));
        assert_eq!(sign_index(359.999), Ok(11));
        // Exact 360 is out of range: skipped with a diagnostic, never a panic.
        let err = sign_index(360.0).unwrap_err();
        assert_eq!(err.clamped_sign_index(), Some(11));
        let err = sign_index(-0.001).unwrap_err();
        assert_eq!(err.clamped_sign_index(), Some(0));
    }
}
