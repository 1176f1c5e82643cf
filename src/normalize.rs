//! The normalizer: arbitrary raw payload → canonical [`ChartViewModel`].
//!
//! One pass, no side effects. Individual malformed planet records are
//! filled with safe defaults and logged; normalization only fails
//! outright when the payload carries nothing recognizable at all.

use serde_json::Value;

use crate::errors::{ChartDiagnostic, MissingChartData};
use crate::log::{debug, warn};
use crate::model::{
    ChartViewModel, Methodology, MethodologyExtension, ParasharaExtension, PlanetRecord,
};
use crate::payload::{AscendantField, LegacyPayload, MultiPayload, Payload, PlanetsField};
use crate::tables;

/// Converts a raw JSON payload into the canonical view model.
///
/// Returns [`MissingChartData`] when neither a methodology bundle nor
/// usable `ascendant`/`planets` fields are present; callers check this
/// value explicitly and show a full-page regenerate state.
pub fn normalize(raw: &Value) -> Result<ChartViewModel, MissingChartData> {
    match Payload::detect(raw) {
        Payload::Multi(multi) => normalize_multi(multi),
        Payload::Legacy(legacy) => {
            let methodology = legacy
                .methodology
                .as_deref()
                .map(Methodology::parse)
                .unwrap_or_default();
            normalize_legacy(&legacy, methodology)
        }
    }
}

/// Extracts the selected sub-bundle, normalizes it as a legacy payload,
/// then attaches the full bundle so switching needs no round trip.
fn normalize_multi(multi: MultiPayload) -> Result<ChartViewModel, MissingChartData> {
    let selected = multi.selected_methodology.as_str();
    let Some(bundle) = multi.methodologies.get(selected) else {
        warn!("selected methodology {selected} missing from bundle");
        return Err(MissingChartData);
    };
    let legacy = LegacyPayload::from_value(bundle);
    let mut model = normalize_legacy(&legacy, Methodology::parse(selected))?;
    model.calculation_summary = multi.calculation_summary.clone();
    model.methodology_bundle = Some(multi.methodologies);
    Ok(model)
}

/// Normalizes one legacy-shaped payload (a top-level legacy document or
/// one sub-bundle of a multi-methodology payload).
pub(crate) fn normalize_legacy(
    legacy: &LegacyPayload,
    methodology: Methodology,
) -> Result<ChartViewModel, MissingChartData> {
    let ascendant_raw = match &legacy.ascendant {
        Some(AscendantField::Degrees(deg)) => Some(*deg),
        Some(AscendantField::Object(obj)) => {
            Some(obj.sidereal_longitude.or(obj.tropical_longitude).unwrap_or(0.0))
        }
        Some(AscendantField::Unusable(_)) | None => None,
    };
    let has_planets = matches!(
        &legacy.planets,
        Some(PlanetsField::List(_) | PlanetsField::Map(_))
    );
    if ascendant_raw.is_none() && !has_planets {
        return Err(MissingChartData);
    }

    let ascendant = wrap_degrees(ascendant_raw.unwrap_or(0.0));
    let ascendant_sign = match (&legacy.ascendant_sign, &legacy.ascendant) {
        (Some(sign), _) if !sign.is_empty() => sign.clone(),
        (_, Some(AscendantField::Object(obj))) if obj.sign_number.is_some() => {
            tables::sign_name(obj.sign_number.unwrap_or(0)).to_string()
        }
        _ => tables::sign_name_for_longitude(ascendant).to_string(),
    };

    let planets = normalize_planets(legacy.planets.as_ref());
    debug!(
        "normalized {} planets for {methodology}, ascendant {ascendant}",
        planets.len()
    );

    let extensions = extensions_for(legacy, &methodology);
    Ok(ChartViewModel {
        ascendant,
        ascendant_sign,
        planets,
        houses: legacy.houses_vec(),
        ayanamsha_value: legacy.ayanamsha_value.unwrap_or(0.0),
        active_methodology: methodology,
        birth_info: legacy.birth_info.clone(),
        calculation_summary: None,
        methodology_bundle: None,
        extensions,
    })
}

fn normalize_planets(planets: Option<&PlanetsField>) -> Vec<PlanetRecord> {
    let mut records: Vec<PlanetRecord> = Vec::new();
    let mut push_unique = |record: PlanetRecord, records: &mut Vec<PlanetRecord>| {
        if records.iter().any(|existing| existing.name == record.name) {
            warn!("duplicate planet record for {}, keeping first", record.name);
        } else {
            records.push(record);
        }
    };

    match planets {
        Some(PlanetsField::Map(map)) => {
            for (name, entry) in map {
                push_unique(planet_from_entry(name.clone(), entry), &mut records);
            }
        }
        Some(PlanetsField::List(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                let Some(name) = entry.get("name").and_then(Value::as_str) else {
                    let diag = ChartDiagnostic::MalformedPlanetRecord {
                        planet: format!("entry {index}"),
                        detail: "record has no name".to_string(),
                    };
                    warn!("{diag}, skipping");
                    continue;
                };
                push_unique(planet_from_entry(name.to_string(), entry), &mut records);
            }
        }
        Some(PlanetsField::Unusable(_)) | None => {}
    }
    records
}

/// Builds one canonical record from a raw entry, filling safe defaults
/// for missing fields (`pada=1`, `retrograde=false`, `longitude=0`) and
/// deriving sign and nakshatra names by table lookup.
fn planet_from_entry(name: String, entry: &Value) -> PlanetRecord {
    let longitude = wrap_degrees(
        f64_field(entry, "sidereal_longitude")
            .or_else(|| f64_field(entry, "longitude"))
            .unwrap_or(0.0),
    );
    let sign = match i64_field(entry, "sign_number") {
        Some(number) => tables::sign_name(number).to_string(),
        None => match str_field(entry, "sign") {
            Some(sign) => sign,
            None => {
                let diag = ChartDiagnostic::MalformedPlanetRecord {
                    planet: name.clone(),
                    detail: "neither sign_number nor sign present".to_string(),
                };
                warn!("{diag}, deriving sign from longitude");
                tables::sign_name_for_longitude(longitude).to_string()
            }
        },
    };
    let nakshatra = match i64_field(entry, "nakshatra_number") {
        Some(number) => tables::nakshatra_name(number).to_string(),
        None => match str_field(entry, "nakshatra") {
            Some(nakshatra) => nakshatra,
            None => tables::nakshatra_name_for_longitude(longitude).to_string(),
        },
    };

    PlanetRecord {
        name,
        sign,
        degree_in_sign: f64_field(entry, "degree_in_sign").unwrap_or(0.0),
        nakshatra,
        pada: u8_field(entry, "pada").unwrap_or(1),
        retrograde: entry
            .get("retrograde")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        longitude,
        house: u8_field(entry, "house"),
        sub_lord: str_field(entry, "sub_lord"),
        star_lord: str_field(entry, "star_lord"),
        sub_sub_lord: str_field(entry, "sub_sub_lord"),
    }
}

/// Selects exactly the extension variant matching the methodology.
/// Errored sub-bundles normalize to the unavailable marker so the UI
/// shows a section-local error next to still-usable base fields.
fn extensions_for(legacy: &LegacyPayload, methodology: &Methodology) -> MethodologyExtension {
    if legacy.is_errored() {
        return MethodologyExtension::Unavailable {
            requested: methodology.clone(),
            message: legacy.error_message.clone(),
        };
    }
    match methodology {
        Methodology::Parashara => {
            let ext = ParasharaExtension {
                current_dasha: legacy.current_dasha.clone(),
                dasha_timeline: legacy.dasha_timeline.clone(),
                dasha_navigator: legacy.dasha_navigator.clone(),
                divisional_charts: legacy.divisional_charts.clone(),
                yogas: legacy.yogas.clone(),
                aspects: legacy.aspects.clone(),
                aspect_summary: legacy.aspect_summary.clone(),
                shadbala: legacy.shadbala.clone(),
                planetary_relationships: legacy.planetary_relationships.clone(),
                ashtakavarga: legacy.ashtakavarga.clone(),
            };
            if ext.is_empty() {
                MethodologyExtension::None
            } else {
                MethodologyExtension::Parashara(ext)
            }
        }
        Methodology::Kp => legacy
            .kp_data
            .clone()
            .map(|kp_data| MethodologyExtension::Kp { kp_data })
            .unwrap_or_default(),
        Methodology::Jaimini => legacy
            .jaimini_data
            .clone()
            .map(|jaimini_data| MethodologyExtension::Jaimini { jaimini_data })
            .unwrap_or_default(),
        Methodology::Western => legacy
            .western_data
            .clone()
            .map(|western_data| MethodologyExtension::Western { western_data })
            .unwrap_or_default(),
        Methodology::Other(_) => MethodologyExtension::None,
    }
}

/// Clamps a raw degree value into [0,360), treating non-finite input
/// as zero so NaN can never reach the projection engine.
fn wrap_degrees(value: f64) -> f64 {
    if !value.is_finite() {
        warn!("non-finite longitude {value}, defaulting to 0");
        return 0.0;
    }
    value.rem_euclid(360.0)
}

fn f64_field(entry: &Value, key: &str) -> Option<f64> {
    entry.get(key).and_then(Value::as_f64)
}

fn i64_field(entry: &Value, key: &str) -> Option<i64> {
    entry.get(key).and_then(Value::as_i64)
}

fn u8_field(entry: &Value, key: &str) -> Option<u8> {
    entry
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u8::try_from(n).ok())
}

fn str_field(entry: &Value, key: &str) -> Option<String> {
    entry
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
}
