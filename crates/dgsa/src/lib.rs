//! Command-line front end for distance-based global sensitivity analysis
//!
//! The numeric work lives in `dgsa_core`; this crate adds:
//! - YAML settings with command-line overrides
//! - Logging to stderr or a rotated log file
//! - The ranked sensitivity table and its JSON form
//! - The Pareto chart rendered as SVG

pub mod chart;
pub mod logging;
pub mod report;
pub mod settings;
pub mod util;

pub use logging::init_logging;
