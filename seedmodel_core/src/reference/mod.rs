//! Module providing the handle to an organism-scoped reference database
//!
//! The database itself (the ModelSEED-style catalog of compounds, reactions
//! and enzymes, the role to reaction lookup, and the biomass equation) is
//! produced by an external loader. This crate only consumes it, through an
//! explicit immutable handle passed into each assembly or load call.

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

use crate::metabolic_model::compound::Compound;
use crate::metabolic_model::reaction::Reaction;

/// An enzyme complex from the reference database
///
/// Carried through for loaders that record which roles an enzyme implements;
/// nothing in the assembly or interchange layer reads past these fields.
#[derive(Clone, Debug)]
pub struct Enzyme {
    /// Used to identify the enzyme
    pub id: String,
    /// Human-readable enzyme name
    pub name: Option<String>,
    /// Functional roles this enzyme implements
    pub roles: IndexSet<String>,
}

/// Snapshot of the reference database for one organism type
#[derive(Clone, Debug)]
pub struct ReferenceDatabase {
    /// Organism type this snapshot was loaded for
    pub organism_type: String,
    /// Map of compound ids to Compound objects
    pub compounds: IndexMap<String, Compound>,
    /// Map of reaction ids to Reaction objects
    pub reactions: IndexMap<String, Reaction>,
    /// Map of enzyme ids to Enzyme objects
    pub enzymes: IndexMap<String, Enzyme>,
    /// Map of functional role to the reaction ids implementing it
    pub role_reactions: IndexMap<String, IndexSet<String>>,
    /// Biomass equation for this organism type
    pub biomass: Reaction,
}

impl ReferenceDatabase {
    /// The reaction ids implementing a functional role, if the role is known
    pub fn reactions_for_role(&self, role: &str) -> Option<&IndexSet<String>> {
        self.role_reactions.get(role)
    }

    /// The organism-type biomass equation
    pub fn biomass_equation(&self) -> Reaction {
        self.biomass.clone()
    }
}

/// Loader seam for reference databases, keyed by organism type
///
/// Production sources parse the ModelSEED flat files; tests use in-memory
/// sources.
pub trait DatabaseSource {
    fn load(&self, organism_type: &str) -> Result<ReferenceDatabase, DatabaseError>;
}

#[derive(Clone, Debug, Error)]
pub enum DatabaseError {
    #[error("No reference database available for organism type '{0}'")]
    UnknownOrganismType(String),
    #[error("Unable to load the reference database: {0}")]
    Unavailable(String),
}
