//! Core rust implementation of seedmodel, a crate for assembling genome scale
//! metabolic models from functional-role annotations and exchanging them with
//! flux balance analysis tools.

pub mod configuration;
pub mod io;
pub mod metabolic_model;
pub mod reference;
