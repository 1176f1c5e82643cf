//! Canonical in-memory chart model.
//!
//! [`ChartViewModel`] is the only shape the rendering layer ever sees.
//! It is constructed once by the normalizer, never mutated in place,
//! and replaced wholesale by the methodology switch controller. Every
//! per-methodology payload lives behind [`MethodologyExtension`], a
//! tagged variant with exactly one case populated at a time, so no
//! stale fields from a previous methodology can leak across a switch.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tables::AspectNature;

/// A named calculation system. The four known systems get dedicated
/// variants; anything else flows through `Other` so an unknown name
/// reaches the "unavailable" path instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Methodology {
    Parashara,
    Kp,
    Jaimini,
    Western,
    Other(String),
}

impl Methodology {
    pub fn parse(name: &str) -> Methodology {
        match name {
            "parashara" => Methodology::Parashara,
            "kp" => Methodology::Kp,
            "jaimini" => Methodology::Jaimini,
            "western" => Methodology::Western,
            other => Methodology::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Methodology::Parashara => "parashara",
            Methodology::Kp => "kp",
            Methodology::Jaimini => "jaimini",
            Methodology::Western => "western",
            Methodology::Other(name) => name,
        }
    }
}

impl Default for Methodology {
    /// The calculation service defaults to Parashara when a payload
    /// carries no methodology discriminant.
    fn default() -> Self {
        Methodology::Parashara
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Methodology {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Methodology {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Methodology::parse(&name))
    }
}

/// Birth details echoed back by the calculation service. Carried
/// through the model for display and for cache-key construction; the
/// core never validates or interprets them.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BirthInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub birth_time: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Stable identity of one birth chart under one methodology. Immutable
/// once formed; used as cache/lookup key material.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BirthFingerprint {
    pub name: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub methodology: Methodology,
}

impl BirthFingerprint {
    /// Builds a fingerprint from echoed birth details. Missing fields
    /// degrade to empty segments so the key stays stable.
    pub fn from_birth_info(info: &BirthInfo, methodology: Methodology) -> BirthFingerprint {
        BirthFingerprint {
            name: info.name.clone().unwrap_or_default(),
            date: info.date.clone().unwrap_or_default(),
            time: info.time.clone().unwrap_or_default(),
            location: info.location_name.clone().unwrap_or_default(),
            methodology,
        }
    }

    /// Cache key for an AI-derived report:
    /// `ai_<moduleId>_<name>_<date>_<time>_<locationName>_<methodology>`.
    pub fn cache_key(&self, module_id: &str) -> String {
        format!(
            "ai_{}_{}_{}_{}_{}_{}",
            module_id, self.name, self.date, self.time, self.location, self.methodology
        )
    }
}

/// Per-bundle tally of which methodologies the service managed to
/// calculate. Drives selector availability in the UI.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculationSummary {
    #[serde(default)]
    pub total_methodologies: u32,
    #[serde(default)]
    pub successful: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub successful_methodologies: Vec<String>,
}

/// One planet in canonical form. After normalization `longitude` is a
/// plain number in [0,360), `sign` and `nakshatra` are table-derived
/// names, and defaults are already filled (`pada=1`, `retrograde=false`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetRecord {
    pub name: String,
    pub sign: String,
    pub degree_in_sign: f64,
    pub nakshatra: String,
    pub pada: u8,
    pub retrograde: bool,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_lord: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub star_lord: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_sub_lord: Option<String>,
}

/// A significant angular relationship between two planets, as delivered
/// by the calculation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectEdge {
    pub planet1: String,
    pub planet2: String,
    #[serde(default)]
    pub aspect_type: String,
    #[serde(default)]
    pub orb: f64,
    pub nature: AspectNature,
    #[serde(default)]
    pub applying: Option<bool>,
}

/// Parashara-specific blocks. Bodies stay untyped JSON: the core
/// guarantees which methodology's data is present, not what is inside.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParasharaExtension {
    #[serde(default)]
    pub current_dasha: Option<Value>,
    #[serde(default)]
    pub dasha_timeline: Option<Value>,
    #[serde(default)]
    pub dasha_navigator: Option<Value>,
    #[serde(default)]
    pub divisional_charts: Option<Value>,
    #[serde(default)]
    pub yogas: Option<Value>,
    #[serde(default)]
    pub aspects: Option<Value>,
    #[serde(default)]
    pub aspect_summary: Option<Value>,
    #[serde(default)]
    pub shadbala: Option<Value>,
    #[serde(default)]
    pub planetary_relationships: Option<Value>,
    #[serde(default)]
    pub ashtakavarga: Option<Value>,
}

impl ParasharaExtension {
    pub fn is_empty(&self) -> bool {
        self.current_dasha.is_none()
            && self.dasha_timeline.is_none()
            && self.dasha_navigator.is_none()
            && self.divisional_charts.is_none()
            && self.yogas.is_none()
            && self.aspects.is_none()
            && self.aspect_summary.is_none()
            && self.shadbala.is_none()
            && self.planetary_relationships.is_none()
            && self.ashtakavarga.is_none()
    }
}

/// Methodology-specific extension data, exactly one case populated at a
/// time. Consumers read only the variant relevant to them and treat any
/// other variant as "nothing to show", not an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum MethodologyExtension {
    Parashara(ParasharaExtension),
    /// House-cusp sub-lords, ruling planets, significators, predictions.
    Kp { kp_data: Value },
    /// Chara karakas, chara dasha, karakamsha, rashi drishti, arudha
    /// padas, sthira karakas, jaimini yogas, three-dimensional analysis.
    Jaimini { jaimini_data: Value },
    /// Aspects, chart patterns, element balance, dignities.
    Western { western_data: Value },
    /// Requested methodology absent or errored in the bundle. The chart
    /// stays usable; the UI shows a section-local error.
    Unavailable {
        requested: Methodology,
        message: Option<String>,
    },
    /// Nothing methodology-specific to show.
    #[default]
    None,
}

impl MethodologyExtension {
    /// Which methodology this extension payload belongs to, if any.
    pub fn methodology(&self) -> Option<Methodology> {
        match self {
            MethodologyExtension::Parashara(_) => Some(Methodology::Parashara),
            MethodologyExtension::Kp { .. } => Some(Methodology::Kp),
            MethodologyExtension::Jaimini { .. } => Some(Methodology::Jaimini),
            MethodologyExtension::Western { .. } => Some(Methodology::Western),
            MethodologyExtension::Unavailable { .. } | MethodologyExtension::None => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, MethodologyExtension::Unavailable { .. })
    }

    /// Dasha timeline, present only while Parashara data is active.
    pub fn dasha_timeline(&self) -> Option<&Value> {
        match self {
            MethodologyExtension::Parashara(ext) => ext.dasha_timeline.as_ref(),
            _ => None,
        }
    }

    /// KP house significators, present only while KP data is active.
    pub fn kp_significators(&self) -> Option<&Value> {
        match self {
            MethodologyExtension::Kp { kp_data } => kp_data.get("house_significators"),
            _ => None,
        }
    }

    /// Aspect edges for the wheel, present only while Western data is
    /// active. Malformed edges in the source array are skipped.
    pub fn wheel_aspects(&self) -> Vec<AspectEdge> {
        let MethodologyExtension::Western { western_data } = self else {
            return Vec::new();
        };
        let Some(edges) = western_data.get("aspects").and_then(Value::as_array) else {
            return Vec::new();
        };
        edges
            .iter()
            .filter_map(|edge| serde_json::from_value(edge.clone()).ok())
            .collect()
    }
}

/// A methodology's sub-bundle, retained verbatim as delivered so the
/// switch controller can re-normalize it without a network round trip.
pub type SubBundle = Value;

/// The canonical chart model handed to every presentational consumer.
///
/// Never mutated in place: methodology switches produce a brand-new
/// value, so a render mid-flight against an older snapshot is unaffected
/// by a concurrent switch.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartViewModel {
    /// Ascendant longitude, degrees in [0,360).
    pub ascendant: f64,
    /// Table-derived sign name for the ascendant.
    pub ascendant_sign: String,
    /// One record per planet, no duplicate names.
    pub planets: Vec<PlanetRecord>,
    /// House cusp longitudes as delivered (tabular display only).
    pub houses: Vec<f64>,
    /// Ayanamsha correction applied by the service, degrees.
    pub ayanamsha_value: f64,
    pub active_methodology: Methodology,
    pub birth_info: Option<BirthInfo>,
    pub calculation_summary: Option<CalculationSummary>,
    /// Present only for multi-methodology payloads; keyed by
    /// methodology name, values kept verbatim for re-switching.
    pub methodology_bundle: Option<BTreeMap<String, SubBundle>>,
    pub extensions: MethodologyExtension,
}

impl ChartViewModel {
    pub fn planet(&self, name: &str) -> Option<&PlanetRecord> {
        self.planets.iter().find(|p| p.name == name)
    }

    /// Fingerprint of this chart under its active methodology, if the
    /// payload carried birth details.
    pub fn fingerprint(&self) -> Option<BirthFingerprint> {
        self.birth_info
            .as_ref()
            .map(|info| BirthFingerprint::from_birth_info(info, self.active_methodology.clone()))
    }
}

/// Static description of one calculation system, mirroring what the
/// service's methodology listing returns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodologyInfo {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub supported_features: &'static [&'static str],
}

/// The four calculation systems the reconciler understands.
pub fn methodology_catalog() -> &'static [MethodologyInfo] {
    const CATALOG: [MethodologyInfo; 4] = [
        MethodologyInfo {
            name: "parashara",
            display_name: "Parashara (Vedic)",
            description: "Traditional Vedic astrology based on Parashara Hora Shastra: \
                          planetary positions, houses, dashas, yogas, divisional charts.",
            supported_features: &[
                "Planetary Positions",
                "Vimshottari Dasha",
                "Yogas",
                "Divisional Charts",
                "Shadbala",
                "Ashtakavarga",
                "Nakshatras",
                "Aspects",
            ],
        },
        MethodologyInfo {
            name: "kp",
            display_name: "KP System (Krishnamurti Paddhati)",
            description: "Krishnamurti Paddhati focusing on sub-lords, cusps and precise \
                          event timing.",
            supported_features: &[
                "Sub-Lord Analysis",
                "KP House Cusps",
                "Ruling Planets",
                "Significators",
                "Event Predictions",
            ],
        },
        MethodologyInfo {
            name: "jaimini",
            display_name: "Jaimini System",
            description: "Jaimini system using Chara Karakas, Rashi Drishti and the Chara \
                          Dasha sign-based timing.",
            supported_features: &[
                "Chara Karakas",
                "Karakamsha",
                "Arudha Padas",
                "Rashi Drishti",
                "Chara Dasha",
                "Jaimini Yogas",
            ],
        },
        MethodologyInfo {
            name: "western",
            display_name: "Western Astrology",
            description: "Western tropical astrology with modern aspects, outer planets and \
                          chart patterns.",
            supported_features: &[
                "Tropical Zodiac",
                "Outer Planets",
                "Western Aspects",
                "Planetary Dignities",
                "Chart Patterns",
                "Element Balance",
            ],
        },
    ];
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn methodology_round_trips_through_strings() {
        for name in ["parashara", "kp", "jaimini", "western"] {
            assert_eq!(Methodology::parse(name).as_str(), name);
        }
        let other = Methodology::parse("nadi");
        assert_eq!(other, Methodology::Other("nadi".into()));
        assert_eq!(other.as_str(), "nadi");
    }

    #[test]
    fn fingerprint_cache_key_matches_fixed_format() {
        let info = BirthInfo {
            name: Some("Asha".into()),
            date: Some("1990-03-14".into()),
            time: Some("06:45".into()),
            location_name: Some("Pune".into()),
            ..BirthInfo::default()
        };
        let fp = BirthFingerprint::from_birth_info(&info, Methodology::Kp);
        assert_eq!(
            fp.cache_key("chart-interpretation"),
            "ai_chart-interpretation_Asha_1990-03-14_06:45_Pune_kp"
        );
    }

    #[test]
    fn extension_accessors_are_variant_exclusive() {
        let parashara = MethodologyExtension::Parashara(ParasharaExtension {
            dasha_timeline: Some(json!({"mahadashas": []})),
            ..ParasharaExtension::default()
        });
        assert!(parashara.dasha_timeline().is_some());
        assert!(parashara.kp_significators().is_none());

        let kp = MethodologyExtension::Kp {
            kp_data: json!({"house_significators": {"1": ["Sun"]}}),
        };
        assert!(kp.dasha_timeline().is_none());
        assert!(kp.kp_significators().is_some());
    }

    #[test]
    fn wheel_aspects_skip_malformed_edges() {
        let ext = MethodologyExtension::Western {
            western_data: json!({
                "aspects": [
                    {"planet1": "Sun", "planet2": "Moon", "aspect_type": "trine",
                     "orb": 1.2, "nature": "soft"},
                    {"planet1": "Mars"},
                    {"planet1": "Venus", "planet2": "Saturn", "aspect_type": "square",
                     "orb": 0.4, "nature": "hard", "applying": true}
                ]
            }),
        };
        let edges = ext.wheel_aspects();
        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0].planet2, "Moon");
        assert_eq!(edges[1].applying, Some(true));
    }

    #[test]
    fn non_western_extensions_have_no_wheel_aspects() {
        assert!(MethodologyExtension::None.wheel_aspects().is_empty());
        let jaimini = MethodologyExtension::Jaimini {
            jaimini_data: json!({"chara_karakas": {}}),
        };
        assert!(jaimini.wheel_aspects().is_empty());
    }

    #[test]
    fn catalog_names_parse_to_known_variants() {
        for info in methodology_catalog() {
            assert!(!matches!(
                Methodology::parse(info.name),
                Methodology::Other(_)
            ));
        }
    }
}
