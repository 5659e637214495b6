//! This module provides the Compound struct representing a metabolic compound

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use derive_builder::Builder;

/// Represents a compound in a metabolic model
///
/// Two compounds are the same entity when they share a name and a location,
/// regardless of any other attributes. Reactions and the biomass equation can
/// therefore be combined without duplicating species.
#[derive(Builder, Debug, Clone)]
pub struct Compound {
    /// Name of the compound
    pub name: String,
    /// Compartment tag, e.g. "c" (cytoplasmic), "e" (extracellular),
    /// "p" (periplasmic), "h" (chloroplast)
    pub location: String,
    /// Compound id in the reference database, defaults to the name
    #[builder(default = "self.name.clone().unwrap_or_default()")]
    pub seed_id: String,
    /// Short name for the compound
    #[builder(default = "None")]
    pub abbreviation: Option<String>,
    /// Chemical formula of the compound
    #[builder(default = "None")]
    pub formula: Option<String>,
    /// Molecular weight of the compound
    #[builder(default = "0.0")]
    pub mw: f64,
    /// Electrical charge of the compound
    #[builder(default = "0")]
    pub charge: i32,
}

impl Compound {
    pub fn new(name: &str, location: &str) -> Compound {
        CompoundBuilder::default()
            .name(name.to_string())
            .location(location.to_string())
            .build()
            .unwrap()
    }
}

impl PartialEq for Compound {
    fn eq(&self, other: &Self) -> bool {
        (&self.name, &self.location) == (&other.name, &other.location)
    }
}

impl Eq for Compound {}

impl Hash for Compound {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.location.hash(state);
    }
}

impl Display for Compound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (location: {})", self.name, self.location)
    }
}

#[cfg(test)]
mod compound_tests {
    use super::*;
    use std::hash::DefaultHasher;

    fn hash_of(compound: &Compound) -> u64 {
        let mut hasher = DefaultHasher::new();
        compound.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn identity_ignores_other_attributes() {
        let plain = Compound::new("ATP", "c");
        let annotated = CompoundBuilder::default()
            .name("ATP".to_string())
            .location("c".to_string())
            .seed_id("cpd00002".to_string())
            .formula(Some("C10H12N5O13P3".to_string()))
            .mw(503.15)
            .charge(-4)
            .build()
            .unwrap();
        assert_eq!(plain, annotated);
        assert_eq!(hash_of(&plain), hash_of(&annotated));
    }

    #[test]
    fn identity_distinguishes_locations() {
        let cytoplasmic = Compound::new("H2O", "c");
        let extracellular = Compound::new("H2O", "e");
        assert_ne!(cytoplasmic, extracellular);
    }

    #[test]
    fn seed_id_defaults_to_name() {
        let compound = Compound::new("ATP", "c");
        assert_eq!(compound.seed_id, "ATP");
    }

    #[test]
    fn display() {
        let compound = Compound::new("D-Glucose", "e");
        assert_eq!(format!("{}", compound), "D-Glucose (location: e)");
    }
}
