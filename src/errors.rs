//! Error taxonomy for the reconciler and wheel renderer.
//!
//! Nothing here is thrown across the core boundary as a panic. The only
//! error that escalates to the caller is [`MissingChartData`] (nothing
//! meaningful to show at all); everything else is a per-record
//! diagnostic that the pipeline logs and recovers from locally, or a
//! marker state carried inside the view model.

use miette::Diagnostic;
use thiserror::Error;

/// No recognizable payload shape was found: neither a methodology
/// bundle nor usable ascendant/planet fields. The caller shows a
/// full-page "no chart, please regenerate" state.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("no recognizable chart data in payload")]
#[diagnostic(
    code(horowheel::normalize::missing_chart_data),
    help("regenerate the chart; the payload carries neither a methodology bundle nor ascendant/planet fields")
)]
pub struct MissingChartData;

/// Per-record problems the pipeline recovers from without aborting.
///
/// These are emitted as diagnostics (logged, or returned next to a
/// clamped/skipped value) so one bad planet or aspect never takes the
/// whole chart down.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ChartDiagnostic {
    /// An individual planet entry was missing expected fields and was
    /// filled with safe defaults (`pada=1`, `retrograde=false`,
    /// `longitude=0`).
    #[error("malformed planet record for {planet}: {detail}")]
    #[diagnostic(code(horowheel::normalize::malformed_planet_record))]
    MalformedPlanetRecord { planet: String, detail: String },

    /// A derived sign index fell outside 0..=11 at an exact 360°
    /// boundary. Carries the angle so the caller can skip that one
    /// label and keep rendering the rest.
    #[error("sign index {index} out of range for angle {angle}")]
    #[diagnostic(code(horowheel::wheel::projection_out_of_range))]
    ProjectionOutOfRange { index: i64, angle: f64 },

    /// An aspect edge referenced a planet name absent from the current
    /// planet set; the edge is skipped.
    #[error("aspect endpoint {endpoint} not found among chart planets")]
    #[diagnostic(code(horowheel::wheel::aspect_endpoint_missing))]
    AspectEndpointMissing { endpoint: String },

    /// The requested methodology is absent from the bundle or carried
    /// an error marker. Switching still succeeds; the extensions slot
    /// records this state so the UI can show a section-local error.
    #[error("methodology {requested} unavailable in chart bundle")]
    #[diagnostic(code(horowheel::switch::methodology_unavailable))]
    MethodologyUnavailable {
        requested: String,
        message: Option<String>,
    },
}

impl ChartDiagnostic {
    /// For [`ChartDiagnostic::ProjectionOutOfRange`], the index clamped
    /// back into 0..=11 for callers that prefer degrading to the
    /// nearest segment over skipping.
    pub fn clamped_sign_index(&self) -> Option<usize> {
        match self {
            ChartDiagnostic::ProjectionOutOfRange { index, .. } => {
                Some((*index).clamp(0, 11) as usize)
            }
            _ => None,
        }
    }
}

/// Failure in an injected key-value store tier. Cache traffic is
/// best-effort: these are logged by the cache layer and never block or
/// fail chart rendering.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("store {op} failed for key {key}: {reason}")]
#[diagnostic(code(horowheel::cache::store_failure))]
pub struct StoreError {
    pub op: &'static str,
    pub key: String,
    pub reason: String,
}

impl StoreError {
    pub fn new(op: &'static str, key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            op,
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_diagnostic_clamps_both_ends() {
        let high = ChartDiagnostic::ProjectionOutOfRange {
            index: 12,
            angle: 360.0,
        };
        assert_eq!(high.clamped_sign_index(), Some(11));
        let low = ChartDiagnostic::ProjectionOutOfRange {
            index: -1,
            angle: -0.0001,
        };
        assert_eq!(low.clamped_sign_index(), Some(0));
        let other = ChartDiagnostic::AspectEndpointMissing {
            endpoint: "Vulcan".into(),
        };
        assert_eq!(other.clamped_sign_index(), None);
    }

    #[test]
    fn diagnostics_render_readable_messages() {
        let d = ChartDiagnostic::MethodologyUnavailable {
            requested: "jaimini".into(),
            message: None,
        };
        assert_eq!(d.to_string(), "methodology jaimini unavailable in chart bundle");
        let d = ChartDiagnostic::MalformedPlanetRecord {
            planet: "Mars".into(),
            detail: "neither sign_number nor sign present".into(),
        };
        assert_eq!(
            d.to_string(),
            "malformed planet record for Mars: neither sign_number nor sign present"
        );
        let d = ChartDiagnostic::AspectEndpointMissing {
            endpoint: "Vulcan".into(),
        };
        assert_eq!(
            d.to_string(),
            "aspect endpoint Vulcan not found among chart planets"
        );
    }
}
