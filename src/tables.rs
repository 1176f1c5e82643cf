//! Fixed lookup tables: zodiac signs, nakshatras, planet glyphs and
//! colors, aspect-nature line styles.
//!
//! Everything here is ordered, immutable data. Sign and nakshatra names
//! in a view model always come from these tables (indexed numerically),
//! never from strings in the raw payload, so inconsistent source naming
//! cannot leak into the canonical model.

use serde::{Deserialize, Serialize};

/// The 12 zodiac signs, in ecliptic order starting at Aries (0°).
pub const SIGNS: [&str; 12] = [
    "Aries",
    "Taurus",
    "Gemini",
    "Cancer",
    "Leo",
    "Virgo",
    "Libra",
    "Scorpio",
    "Sagittarius",
    "Capricorn",
    "Aquarius",
    "Pisces",
];

/// The 27 nakshatras, in ecliptic order starting at Ashwini.
pub const NAKSHATRAS: [&str; 27] = [
    "Ashwini",
    "Bharani",
    "Krittika",
    "Rohini",
    "Mrigashira",
    "Ardra",
    "Punarvasu",
    "Pushya",
    "Ashlesha",
    "Magha",
    "Purva Phalguni",
    "Uttara Phalguni",
    "Hasta",
    "Chitra",
    "Swati",
    "Vishakha",
    "Anuradha",
    "Jyeshtha",
    "Mula",
    "Purva Ashadha",
    "Uttara Ashadha",
    "Shravana",
    "Dhanishta",
    "Shatabhisha",
    "Purva Bhadrapada",
    "Uttara Bhadrapada",
    "Revati",
];

/// Width of one sign segment in degrees.
pub const SIGN_SPAN_DEG: f64 = 30.0;

/// Width of one nakshatra segment in degrees (360/27).
pub const NAKSHATRA_SPAN_DEG: f64 = 360.0 / 27.0;

/// Sign name for a raw `sign_number` field. Indices wrap modulo 12 so
/// a 12 coming off the wire still lands on Aries instead of panicking.
pub fn sign_name(sign_number: i64) -> &'static str {
    SIGNS[sign_number.rem_euclid(12) as usize]
}

/// Sign name for an ecliptic longitude in degrees.
pub fn sign_name_for_longitude(longitude: f64) -> &'static str {
    let idx = (longitude.rem_euclid(360.0) / SIGN_SPAN_DEG) as i64;
    sign_name(idx)
}

/// Three-letter sign abbreviation used for wheel labels.
pub fn sign_abbrev(index: usize) -> &'static str {
    &SIGNS[index % 12][..3]
}

/// Nakshatra name for a raw 1-based `nakshatra_number` field.
pub fn nakshatra_name(nakshatra_number: i64) -> &'static str {
    NAKSHATRAS[(nakshatra_number - 1).rem_euclid(27) as usize]
}

/// Nakshatra name for an ecliptic longitude in degrees.
pub fn nakshatra_name_for_longitude(longitude: f64) -> &'static str {
    let idx = (longitude.rem_euclid(360.0) / NAKSHATRA_SPAN_DEG) as i64;
    NAKSHATRAS[idx.rem_euclid(27) as usize]
}

/// Unicode glyph for a planet marker. Bodies outside the table fall
/// back to the first character of their name at the call site.
pub fn planet_symbol(name: &str) -> Option<&'static str> {
    Some(match name {
        "Sun" => "\u{2609}",
        "Moon" => "\u{263D}",
        "Mercury" => "\u{263F}",
        "Venus" => "\u{2640}",
        "Mars" => "\u{2642}",
        "Jupiter" => "\u{2643}",
        "Saturn" => "\u{2644}",
        "Uranus" => "\u{2645}",
        "Neptune" => "\u{2646}",
        "Pluto" => "\u{2647}",
        "Chiron" => "\u{26B7}",
        "Rahu" => "\u{260A}",
        "Ketu" => "\u{260B}",
        _ => return None,
    })
}

/// Fill color for a planet marker.
pub fn planet_color(name: &str) -> &'static str {
    match name {
        "Sun" => "#FFD700",
        "Moon" => "#C0C0C0",
        "Mercury" => "#87CEEB",
        "Venus" => "#FF69B4",
        "Mars" => "#FF4500",
        "Jupiter" => "#FFA500",
        "Saturn" => "#8B4513",
        "Uranus" => "#00CED1",
        "Neptune" => "#4169E1",
        "Pluto" => "#8B008B",
        _ => "#888888",
    }
}

/// Qualitative nature of an aspect, as classified by the calculation
/// service. Drives line styling only; the core never re-derives it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectNature {
    Hard,
    Soft,
    Neutral,
    Minor,
}

/// Line style for an aspect of a given nature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectStyle {
    pub color: &'static str,
    pub width: f64,
    pub dashed: bool,
}

/// Nature → style map: hard aspects solid high-contrast red, soft
/// solid blue, neutral solid muted green, minor dashed grey.
pub fn aspect_style(nature: AspectNature) -> AspectStyle {
    match nature {
        AspectNature::Hard => AspectStyle {
            color: "#EF4444",
            width: 2.0,
            dashed: false,
        },
        AspectNature::Soft => AspectStyle {
            color: "#3B82F6",
            width: 2.0,
            dashed: false,
        },
        AspectNature::Neutral => AspectStyle {
            color: "#10B981",
            width: 1.5,
            dashed: false,
        },
        AspectNature::Minor => AspectStyle {
            color: "#888888",
            width: 1.0,
            dashed: true,
        },
    }
}
