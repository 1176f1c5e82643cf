//! Methodology switch controller.
//!
//! Flipping between calculation systems is a pure state transition over
//! data already delivered in the bundle; no network round trip. Every
//! transition returns a brand-new [`ChartViewModel`] (copy-on-write),
//! so a render mid-flight against the old snapshot is unaffected by a
//! concurrent switch. Switching never fails: an unknown or errored
//! target degrades to the unavailable extension state while the chart
//! itself stays usable.

use crate::errors::ChartDiagnostic;
use crate::log::{debug, warn};
use crate::model::{ChartViewModel, Methodology, MethodologyExtension};
use crate::normalize::normalize_legacy;
use crate::payload::LegacyPayload;

/// Produces a new view model with `target` active.
///
/// - Legacy single-methodology sources (no bundle) only update the
///   active methodology; every other field is left untouched.
/// - A target absent from the bundle, or whose sub-bundle is unusable,
///   yields a copy with extensions marked unavailable.
/// - An errored sub-bundle still contributes its usable base fields
///   (ascendant/planets/houses) next to the unavailable marker.
/// - A valid sub-bundle replaces the base fields and selects exactly
///   the extension variant matching `target`; any other methodology's
///   extension payload from the previous model is discarded.
pub fn switch_methodology(model: &ChartViewModel, target: &str) -> ChartViewModel {
    let requested = Methodology::parse(target);

    let Some(bundle) = &model.methodology_bundle else {
        // Degraded mode: single-methodology source, switching is cosmetic.
        debug!("no methodology bundle, cosmetic switch to {requested}");
        let mut next = model.clone();
        next.active_methodology = requested;
        return next;
    };

    let Some(sub_bundle) = bundle.get(target) else {
        return unavailable(model, requested, None);
    };

    let legacy = LegacyPayload::from_value(sub_bundle);
    match normalize_legacy(&legacy, requested.clone()) {
        Ok(normalized) => {
            debug!("switched to {requested}");
            ChartViewModel {
                // Base fields come from the target's sub-bundle alone.
                ascendant: normalized.ascendant,
                ascendant_sign: normalized.ascendant_sign,
                planets: normalized.planets,
                houses: normalized.houses,
                ayanamsha_value: normalized.ayanamsha_value,
                birth_info: normalized.birth_info.or_else(|| model.birth_info.clone()),
                active_methodology: requested,
                // Bundle and summary survive the switch for re-switching.
                calculation_summary: model.calculation_summary.clone(),
                methodology_bundle: model.methodology_bundle.clone(),
                // normalize_legacy already selected exactly the variant
                // matching the target (or the unavailable marker for an
                // errored sub-bundle).
                extensions: normalized.extensions,
            }
        }
        Err(_) => unavailable(model, requested, legacy.error_message.clone()),
    }
}

/// Copy of `model` with the target active and extensions cleared to the
/// unavailable marker. The previous base fields stay so the UI can keep
/// showing a chart next to the section-local error.
fn unavailable(
    model: &ChartViewModel,
    requested: Methodology,
    message: Option<String>,
) -> ChartViewModel {
    let diag = ChartDiagnostic::MethodologyUnavailable {
        requested: requested.to_string(),
        message: message.clone(),
    };
    warn!("{diag}");
    let mut next = model.clone();
    next.active_methodology = requested.clone();
    next.extensions = MethodologyExtension::Unavailable { requested, message };
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn multi_model() -> ChartViewModel {
        normalize(&json!({
            "selected_methodology": "parashara",
            "methodologies": {
                "parashara": {
                    "ascendant": 58.0,
                    "ascendant_sign": "Taurus",
                    "planets": [
                        {"name": "Sun", "sign_number": 4, "sidereal_longitude": 125.0,
                         "nakshatra_number": 10, "degree_in_sign": 5.0},
                        {"name": "Moon", "sign_number": 1, "sidereal_longitude": 42.0,
                         "nakshatra_number": 4, "degree_in_sign": 12.0}
                    ],
                    "houses": [58.0, 88.0, 118.0],
                    "dasha_timeline": {"mahadashas": [{"lord": "Venus"}]},
                    "yogas": [{"name": "Gajakesari"}]
                },
                "kp": {
                    "ascendant": 57.4,
                    "planets": [
                        {"name": "Sun", "sign_number": 4, "sidereal_longitude": 124.6,
                         "nakshatra_number": 10, "sub_lord": "Jupiter"}
                    ],
                    "houses": [57.4, 87.2],
                    "kp_data": {
                        "house_significators": {"1": ["Sun", "Mars"]},
                        "ruling_planets": ["Sun", "Moon"]
                    }
                },
                "jaimini": {
                    "ascendant": 58.0,
                    "planets": [],
                    "error": true,
                    "error_message": "chara karaka computation failed"
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn noop_switch_is_field_equal() {
        let model = multi_model();
        let same = switch_methodology(&model, "parashara");
        assert_eq!(same, model);
    }

    #[test]
    fn switch_replaces_base_fields_from_target_bundle() {
        let model = multi_model();
        let kp = switch_methodology(&model, "kp");
        assert_eq!(kp.active_methodology, Methodology::Kp);
        assert_eq!(kp.ascendant, 57.4);
        assert_eq!(kp.planets.len(), 1);
        assert_eq!(kp.planets[0].sub_lord.as_deref(), Some("Jupiter"));
        assert_eq!(kp.houses, vec![57.4, 87.2]);
        // Bundle survives so the user can switch back.
        assert!(kp.methodology_bundle.is_some());
        // The original model is untouched.
        assert_eq!(model.active_methodology, Methodology::Parashara);
        assert_eq!(model.ascendant, 58.0);
    }

    #[test]
    fn no_stale_extension_fields_after_switch() {
        let model = multi_model();
        assert!(model.extensions.dasha_timeline().is_some());

        let kp = switch_methodology(&model, "kp");
        assert_eq!(kp.extensions.dasha_timeline(), None);
        assert!(kp.extensions.kp_significators().is_some());
        assert_eq!(kp.extensions.methodology(), Some(Methodology::Kp));

        // And back again: KP data gone, dashas restored.
        let back = switch_methodology(&kp, "parashara");
        assert!(back.extensions.dasha_timeline().is_some());
        assert_eq!(back.extensions.kp_significators(), None);
    }

    #[test]
    fn unknown_target_still_succeeds_with_unavailable_marker() {
        let model = multi_model();
        let next = switch_methodology(&model, "western");
        assert_eq!(next.active_methodology, Methodology::Western);
        assert!(next.extensions.is_unavailable());
        // Base chart stays usable for the UI.
        assert_eq!(next.ascendant, model.ascendant);
        assert_eq!(next.planets, model.planets);
    }

    #[test]
    fn errored_bundle_copies_usable_base_fields() {
        let model = multi_model();
        let jaimini = switch_methodology(&model, "jaimini");
        assert_eq!(jaimini.active_methodology, Methodology::Jaimini);
        // Ascendant from the errored sub-bundle is still usable data.
        assert_eq!(jaimini.ascendant, 58.0);
        match &jaimini.extensions {
            MethodologyExtension::Unavailable { requested, message } => {
                assert_eq!(*requested, Methodology::Jaimini);
                assert_eq!(message.as_deref(), Some("chara karaka computation failed"));
            }
            other => panic!("expected unavailable extension, got {other:?}"),
        }
    }

    #[test]
    fn legacy_model_switch_is_cosmetic_only() {
        let legacy = normalize(&json!({
            "ascendant": 200.0,
            "planets": [{"name": "Sun", "longitude": 10.0}],
            "dasha_timeline": {"mahadashas": []}
        }))
        .unwrap();
        let switched = switch_methodology(&legacy, "kp");
        assert_eq!(switched.active_methodology, Methodology::Kp);
        // Everything else untouched, extension payload included.
        assert_eq!(switched.ascendant, legacy.ascendant);
        assert_eq!(switched.planets, legacy.planets);
        assert_eq!(switched.extensions, legacy.extensions);
    }
}
