//! Drawing primitives emitted by the wheel renderer.
//!
//! A [`DrawOp`] sequence is the renderer's entire output contract: the
//! presentational layer replays it in order (painter's algorithm), so
//! z-ordering is encoded purely by position in the sequence.

use glam::DVec2;

use crate::tables::{AspectNature, AspectStyle, aspect_style};

/// Stroke styling for circles and lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f64,
    pub dashed: bool,
    pub opacity: f64,
}

impl Stroke {
    pub const fn solid(color: &'static str, width: f64) -> Stroke {
        Stroke {
            color,
            width,
            dashed: false,
            opacity: 1.0,
        }
    }

    /// Aspect lines render semi-transparent so planet glyphs and cusp
    /// lines stay readable underneath a dense aspect web.
    pub fn for_aspect(nature: AspectNature) -> Stroke {
        let AspectStyle {
            color,
            width,
            dashed,
        } = aspect_style(nature);
        Stroke {
            color,
            width,
            dashed,
            opacity: 0.5,
        }
    }
}

/// Role of a text element, used by the presentational layer to pick
/// font classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextClass {
    HouseNumber,
    SignLabel,
    AscendantLabel,
    RetrogradeTag,
}

/// One drawing instruction, in paint order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Circle {
        center: DVec2,
        radius: f64,
        stroke: Stroke,
    },
    Line {
        from: DVec2,
        to: DVec2,
        stroke: Stroke,
    },
    Text {
        pos: DVec2,
        content: String,
        class: TextClass,
    },
    /// A planet glyph: filled disc plus symbol. Retrograde planets also
    /// get a trailing "R" text op.
    PlanetMarker {
        pos: DVec2,
        name: String,
        symbol: String,
        color: &'static str,
        retrograde: bool,
    },
}

impl DrawOp {
    pub fn is_line(&self) -> bool {
        matches!(self, DrawOp::Line { .. })
    }

    pub fn is_planet_marker(&self) -> bool {
        matches!(self, DrawOp::PlanetMarker { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_strokes_follow_the_nature_map() {
        let hard = Stroke::for_aspect(AspectNature::Hard);
        assert!(!hard.dashed);
        assert_eq!(hard.color, "#EF4444");
        let minor = Stroke::for_aspect(AspectNature::Minor);
        assert!(minor.dashed);
        assert_eq!(minor.opacity, 0.5);
    }
}
