//! Integration tests for the dgsa_core pipeline
//!
//! Tests are organized by topic:
//! - `pipeline` - End-to-end runs on the synthetic five-parameter problem
//! - `properties` - Property checks for response formulas and distances

mod pipeline;
mod properties;
