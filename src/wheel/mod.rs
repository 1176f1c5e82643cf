//! Chart-wheel renderer: canonical view model → ordered draw sequence.
//!
//! Layout follows the classic circular wheel: an outer and inner ring,
//! twelve equal-house cusp lines anchored at the ascendant, sign labels
//! nudged to the middle of their 30° segment, planet markers on an
//! intermediate ring, and aspect lines connecting planet positions.
//!
//! Paint order is part of the contract: background rings and cusps
//! first, then every aspect line, then every planet marker, so lines
//! never visually cover planet glyphs.

pub mod ops;
pub mod project;

use glam::{DVec2, dvec2};

use crate::errors::ChartDiagnostic;
use crate::log::warn;
use crate::model::{AspectEdge, ChartViewModel, PlanetRecord};
use crate::tables;

pub use ops::{DrawOp, Stroke, TextClass};
pub use project::{project, sign_index, wheel_angle};

/// Geometry of the wheel layout, derived from one edge size.
///
/// Radius factors match the service dashboard's wheel: outer ring at
/// 45% of the size, inner ring at 25%, planets at 35%.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelLayout {
    pub size: f64,
}

impl WheelLayout {
    pub fn new(size: f64) -> WheelLayout {
        WheelLayout { size }
    }

    pub fn center(&self) -> DVec2 {
        dvec2(self.size / 2.0, self.size / 2.0)
    }

    pub fn outer_radius(&self) -> f64 {
        self.size * 0.45
    }

    pub fn inner_radius(&self) -> f64 {
        self.size * 0.25
    }

    pub fn planet_radius(&self) -> f64 {
        self.size * 0.35
    }
}

impl Default for WheelLayout {
    fn default() -> WheelLayout {
        WheelLayout::new(500.0)
    }
}

const RING_STROKE: Stroke = Stroke::solid("#999999", 2.0);
const INNER_RING_STROKE: Stroke = Stroke::solid("#999999", 1.0);
const CUSP_STROKE: Stroke = Stroke::solid("#666666", 1.0);
const ASCENDANT_STROKE: Stroke = Stroke::solid("#FF0000", 3.0);

/// Renders the full wheel for a view model.
///
/// Aspect lines are drawn only while Western extension data is active;
/// other methodologies present their aspects in tabular form elsewhere.
pub fn render_wheel(model: &ChartViewModel, layout: &WheelLayout) -> Vec<DrawOp> {
    let center = layout.center();
    let reference = model.ascendant;
    let mut ops = Vec::new();

    ops.push(DrawOp::Circle {
        center,
        radius: layout.outer_radius(),
        stroke: RING_STROKE,
    });
    ops.push(DrawOp::Circle {
        center,
        radius: layout.inner_radius(),
        stroke: INNER_RING_STROKE,
    });

    // Equal-house cusps every 30° from the ascendant. Per-methodology
    // Placidus cusp degrees are shown only in tabular form elsewhere.
    for house in 0..12 {
        let cusp = reference + f64::from(house) * tables::SIGN_SPAN_DEG;
        ops.push(DrawOp::Line {
            from: center,
            to: project(cusp, reference, layout.outer_radius(), center),
            stroke: CUSP_STROKE,
        });
        // House number centered within the segment.
        ops.push(DrawOp::Text {
            pos: project(cusp + 15.0, reference, layout.outer_radius() * 0.9, center),
            content: (house + 1).to_string(),
            class: TextClass::HouseNumber,
        });
    }

    // Sign labels: same segment centers, but named by the segment's
    // absolute zodiac position, just outside the outer ring.
    for segment in 0..12 {
        let cusp = reference + f64::from(segment) * tables::SIGN_SPAN_DEG;
        let absolute = wheel_angle(cusp, 0.0);
        match sign_index(absolute) {
            Ok(index) => ops.push(DrawOp::Text {
                pos: project(cusp + 15.0, reference, layout.outer_radius() * 1.1, center),
                content: tables::sign_abbrev(index).to_string(),
                class: TextClass::SignLabel,
            }),
            Err(diag) => {
                // One bad label never fails the chart.
                warn!("skipping sign label: {diag}");
            }
        }
    }

    // Ascendant axis: the reference longitude projects to the fixed
    // anchor at the top of the wheel.
    let anchor = project(reference, reference, layout.outer_radius(), center);
    ops.push(DrawOp::Line {
        from: center,
        to: anchor,
        stroke: ASCENDANT_STROKE,
    });
    ops.push(DrawOp::Text {
        pos: project(reference, reference, layout.outer_radius() + 15.0, center),
        content: "ASC".to_string(),
        class: TextClass::AscendantLabel,
    });

    ops.extend(render_aspects(
        &model.extensions.wheel_aspects(),
        &model.planets,
        reference,
        layout,
    ));
    ops
}

/// Renders aspect lines and planet markers.
///
/// Every aspect-line op is emitted before any planet-marker op. An edge
/// referencing a planet name absent from `planets` is skipped silently:
/// a data-consistency mismatch in one edge is not a fatal error.
pub fn render_aspects(
    aspects: &[AspectEdge],
    planets: &[PlanetRecord],
    reference: f64,
    layout: &WheelLayout,
) -> Vec<DrawOp> {
    let center = layout.center();
    let radius = layout.planet_radius();
    let mut ops = Vec::new();

    for edge in aspects {
        let endpoints = (
            planets.iter().find(|p| p.name == edge.planet1),
            planets.iter().find(|p| p.name == edge.planet2),
        );
        let (Some(first), Some(second)) = endpoints else {
            let missing = if endpoints.0.is_none() {
                &edge.planet1
            } else {
                &edge.planet2
            };
            let diag = ChartDiagnostic::AspectEndpointMissing {
                endpoint: missing.clone(),
            };
            warn!("{diag}, skipping edge");
            continue;
        };
        ops.push(DrawOp::Line {
            from: project(first.longitude, reference, radius, center),
            to: project(second.longitude, reference, radius, center),
            stroke: Stroke::for_aspect(edge.nature),
        });
    }

    for planet in planets {
        let symbol = tables::planet_symbol(&planet.name)
            .map(str::to_string)
            .unwrap_or_else(|| planet.name.chars().next().unwrap_or('?').to_string());
        let pos = project(planet.longitude, reference, radius, center);
        ops.push(DrawOp::PlanetMarker {
            pos,
            name: planet.name.clone(),
            symbol,
            color: tables::planet_color(&planet.name),
            retrograde: planet.retrograde,
        });
        if planet.retrograde {
            ops.push(DrawOp::Text {
                pos: pos + dvec2(10.0, -10.0),
                content: "R".to_string(),
                class: TextClass::RetrogradeTag,
            });
        }
    }
    ops
}
