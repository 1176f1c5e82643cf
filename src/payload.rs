//! Typed deserialization boundary for raw calculation-service payloads.
//!
//! The service speaks two incompatible shapes: a legacy single-system
//! payload with chart fields at the top level, and a newer bundle
//! keyed by methodology name. Shape detection happens exactly once,
//! in [`Payload::detect`]; everything downstream operates on a known
//! variant instead of probing fields defensively. Fields the service
//! has historically delivered in more than one form (`ascendant` as
//! number or object, `planets` as array or map) are modeled as
//! untagged enums so the variance stays contained in this module.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::log::warn;
use crate::model::{BirthInfo, CalculationSummary};

/// A raw payload, classified once by its discriminant fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Legacy(LegacyPayload),
    Multi(MultiPayload),
}

impl Payload {
    /// Classifies a raw JSON document. Multi-methodology requires both
    /// a `methodologies` map and a `selected_methodology` discriminant;
    /// anything else is treated as the legacy single-system shape.
    pub fn detect(raw: &Value) -> Payload {
        let has_bundle = raw.get("methodologies").is_some_and(Value::is_object);
        let selected = raw.get("selected_methodology").and_then(Value::as_str);
        if let (true, Some(selected)) = (has_bundle, selected) {
            return Payload::Multi(MultiPayload::from_parts(raw, selected));
        }
        Payload::Legacy(LegacyPayload::from_value(raw))
    }
}

/// The newer bundle shape: one sub-bundle per methodology, each shaped
/// like a legacy payload, kept verbatim for later switching.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPayload {
    pub selected_methodology: String,
    pub methodologies: BTreeMap<String, Value>,
    pub calculation_summary: Option<CalculationSummary>,
}

impl MultiPayload {
    fn from_parts(raw: &Value, selected: &str) -> MultiPayload {
        let methodologies = raw
            .get("methodologies")
            .and_then(Value::as_object)
            .map(|map| {
                map.iter()
                    .map(|(name, bundle)| (name.clone(), bundle.clone()))
                    .collect()
            })
            .unwrap_or_default();
        let calculation_summary = raw
            .get("calculation_summary")
            .cloned()
            .and_then(|summary| serde_json::from_value(summary).ok());
        MultiPayload {
            selected_methodology: selected.to_string(),
            methodologies,
            calculation_summary,
        }
    }
}

/// The legacy single-system shape: chart fields at the top level plus
/// methodology-specific extension blocks. Also the shape of each
/// sub-bundle inside a [`MultiPayload`].
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LegacyPayload {
    pub ascendant: Option<AscendantField>,
    pub ascendant_sign: Option<String>,
    pub planets: Option<PlanetsField>,
    /// House cusp longitudes; kept raw, extracted via [`Self::houses_vec`].
    pub houses: Option<Value>,
    pub ayanamsha_value: Option<f64>,
    pub methodology: Option<String>,
    pub birth_info: Option<BirthInfo>,
    /// Error marker set by the service when this system's calculation
    /// failed. Truthiness matters, not the carried value.
    pub error: Option<Value>,
    pub error_message: Option<String>,
    // Parashara extension blocks.
    pub current_dasha: Option<Value>,
    pub dasha_timeline: Option<Value>,
    pub dasha_navigator: Option<Value>,
    pub divisional_charts: Option<Value>,
    pub yogas: Option<Value>,
    pub aspects: Option<Value>,
    pub aspect_summary: Option<Value>,
    pub shadbala: Option<Value>,
    pub planetary_relationships: Option<Value>,
    pub ashtakavarga: Option<Value>,
    // Other methodologies' extension blocks.
    pub kp_data: Option<Value>,
    pub jaimini_data: Option<Value>,
    pub western_data: Option<Value>,
}

impl LegacyPayload {
    /// Deserializes leniently: a document that fails to match the
    /// legacy shape entirely yields an empty payload, which the
    /// normalizer then rejects as missing chart data.
    pub fn from_value(raw: &Value) -> LegacyPayload {
        match serde_json::from_value(raw.clone()) {
            Ok(payload) => payload,
            Err(err) => {
                warn!("payload does not match legacy shape: {err}");
                LegacyPayload::default()
            }
        }
    }

    /// True when the service flagged this system's calculation as
    /// failed. `false` and `null` markers count as not errored.
    pub fn is_errored(&self) -> bool {
        match &self.error {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(_) => true,
        }
    }

    /// House cusps as plain numbers; non-numeric entries are dropped.
    pub fn houses_vec(&self) -> Vec<f64> {
        match &self.houses {
            Some(Value::Array(items)) => items.iter().filter_map(Value::as_f64).collect(),
            _ => Vec::new(),
        }
    }
}

/// `ascendant` as the service has delivered it over time: a plain
/// ecliptic longitude, or an object carrying per-zodiac longitudes and
/// a sign number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AscendantField {
    Degrees(f64),
    Object(AscendantObject),
    /// Anything else; unusable, handled as absent by the normalizer.
    Unusable(Value),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct AscendantObject {
    pub sidereal_longitude: Option<f64>,
    pub tropical_longitude: Option<f64>,
    pub sign_number: Option<i64>,
}

/// `planets` as either an array of records or a name→record map.
/// Entries stay raw so one malformed record can be defaulted without
/// rejecting its siblings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PlanetsField {
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    /// Anything else; unusable, handled as absent by the normalizer.
    Unusable(Value),
}
