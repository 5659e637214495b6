//! Module providing the Model struct for representing a metabolic model.

pub mod build;
pub mod compound;
pub mod model;
pub mod reaction;
