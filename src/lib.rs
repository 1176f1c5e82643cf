//! Chart view-model reconciler and polar wheel projection for astrology
//! dashboards.
//!
//! Backend calculation services deliver chart data in two wire shapes: a
//! legacy single-system payload and a bundled multi-methodology payload
//! (Parashara, KP, Jaimini, Western). This crate normalizes either shape
//! into one canonical [`ChartViewModel`], switches the active methodology
//! as a pure state transition over the bundle, projects ecliptic
//! longitudes onto a circular wheel, and renders the wheel as an ordered
//! sequence of backend-agnostic draw operations.
//!
//! ```
//! use horowheel::{WheelLayout, normalize, render_wheel, switch_methodology};
//! use serde_json::json;
//!
//! let payload = json!({
//!     "selected_methodology": "parashara",
//!     "methodologies": {
//!         "parashara": {
//!             "ascendant": 58.0,
//!             "planets": [{"name": "Sun", "sidereal_longitude": 125.0}],
//!             "houses": [58.0, 88.0]
//!         },
//!         "kp": {
//!             "ascendant": 57.4,
//!             "planets": [{"name": "Sun", "sidereal_longitude": 124.6}]
//!         }
//!     }
//! });
//!
//! let chart = normalize(&payload)?;
//! let kp = switch_methodology(&chart, "kp");
//! let ops = render_wheel(&kp, &WheelLayout::default());
//! assert!(!ops.is_empty());
//! # Ok::<(), horowheel::MissingChartData>(())
//! ```

pub mod cache;
pub mod errors;
mod log;
pub mod model;
pub mod normalize;
pub mod payload;
pub mod switch;
pub mod tables;
pub mod wheel;

pub use cache::{CachedReport, KeyValueStore, MemoryStore, TieredCache};
pub use errors::{ChartDiagnostic, MissingChartData, StoreError};
pub use model::{
    AspectEdge, BirthFingerprint, BirthInfo, CalculationSummary, ChartViewModel, Methodology,
    MethodologyExtension, PlanetRecord, methodology_catalog,
};
pub use normalize::normalize;
pub use payload::Payload;
pub use switch::switch_methodology;
pub use wheel::{DrawOp, Stroke, TextClass, WheelLayout, project, render_wheel, wheel_angle};
