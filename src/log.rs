//! Conditional logging macros.
//!
//! With the `tracing` feature enabled these re-export the `tracing`
//! macros; without it they expand to no-ops so the reconciler stays
//! dependency-free at runtime for embedders that don't want logging.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {{
        // Consume the arguments so call sites look the same either way.
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
