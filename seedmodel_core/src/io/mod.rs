//! Module for reading and writing Models

pub mod annotation;
pub mod flat;
pub mod gapfill;
pub mod sbml;
