//! This module provides the Model struct for representing an entire metabolic model

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

use crate::configuration::CONFIGURATION;
use crate::metabolic_model::compound::Compound;
use crate::metabolic_model::reaction::Reaction;

/// Gap-fill provenance recorded for a single reaction
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GapfillProvenance {
    /// Which gap-filling step proposed the reaction
    pub method: String,
    /// Media the gap-fill run was trying to grow on
    pub media: String,
}

/// Represents a Genome Scale Metabolic Model for one organism
///
/// The model owns its reaction records outright; provenance and
/// classification queries go through the model rather than through
/// back-pointers on the entities.
#[derive(Clone, Debug)]
pub struct Model {
    /// Id associated with the Model
    pub id: String,
    /// Human-readable model name
    pub name: String,
    /// Organism type the model was built for (e.g. gramnegative)
    pub organism_type: String,
    /// Map of reaction ids to Reaction objects
    pub reactions: IndexMap<String, Reaction>,
    /// Every compound referenced by an owned reaction. Derived from the
    /// reaction set; compounds referenced only by the biomass reaction are
    /// not included.
    pub compounds: IndexSet<Compound>,
    /// Map of functional role to the reaction ids implementing it
    pub roles: IndexMap<String, IndexSet<String>>,
    /// The distinguished growth reaction, kept out of the reaction set
    pub biomass_reaction: Option<Reaction>,
    /// Media unlocked by gap-filling
    pub gapfilled_media: IndexSet<String>,
    /// Map of reaction id to gap-fill provenance. Every key must also be a
    /// key of the reaction set, which record_gapfill enforces.
    pub gf_reactions: IndexMap<String, GapfillProvenance>,
}

impl Model {
    pub fn new(id: &str, name: &str, organism_type: &str) -> Self {
        Model {
            id: id.to_string(),
            name: name.to_string(),
            organism_type: organism_type.to_string(),
            reactions: IndexMap::new(),
            compounds: IndexSet::new(),
            roles: IndexMap::new(),
            biomass_reaction: None,
            gapfilled_media: IndexSet::new(),
            gf_reactions: IndexMap::new(),
        }
    }

    /// Union a set of reactions into the model
    ///
    /// The derived compound set is updated incrementally with each new
    /// reaction's left and right compounds.
    pub fn add_reactions(&mut self, reactions: IndexSet<Reaction>) {
        for reaction in reactions {
            for compound in reaction.compounds() {
                self.compounds.insert(compound.clone());
            }
            self.reactions.insert(reaction.id.clone(), reaction);
        }
    }

    /// Union role to reaction-id mappings into the model
    ///
    /// Reaction ids are not checked against the reaction set here; assembly
    /// may record a role before its reactions are confirmed present.
    pub fn add_roles(&mut self, roles: IndexMap<String, IndexSet<String>>) {
        for (role, reaction_ids) in roles {
            self.roles.entry(role).or_default().extend(reaction_ids);
        }
    }

    /// Set the biomass reaction, replacing any previous value
    pub fn set_biomass_reaction(&mut self, reaction: Reaction) {
        self.biomass_reaction = Some(reaction);
    }

    /// Is this compound referenced by any reaction owned by the model?
    pub fn has_compound(&self, compound: &Compound) -> bool {
        self.compounds.contains(compound)
    }

    /// The reactions that mention this compound, computed on demand
    pub fn reactions_with_compound(&self, compound: &Compound) -> Vec<&Reaction> {
        self.reactions
            .values()
            .filter(|reaction| reaction.has_compound(compound))
            .collect()
    }

    /// Is this a common compound, per the configured reaction limit?
    pub fn is_common_compound(&self, compound: &Compound) -> bool {
        let limit = CONFIGURATION.read().unwrap().common_compound_limit;
        self.is_common_with_limit(compound, limit)
    }

    /// Common means referenced by strictly more reactions than the limit
    pub fn is_common_with_limit(&self, compound: &Compound, limit: usize) -> bool {
        self.reactions_with_compound(compound).len() > limit
    }

    /// Mark an owned reaction as gap-filled and record its provenance
    ///
    /// The reaction must already be in the reaction set; provenance for a
    /// reaction the model does not own is a data-integrity error.
    pub fn record_gapfill(
        &mut self,
        reaction_id: &str,
        method: &str,
        media: &str,
    ) -> Result<(), ModelError> {
        let Some(reaction) = self.reactions.get_mut(reaction_id) else {
            return Err(ModelError::UnknownReaction(reaction_id.to_string()));
        };
        reaction.is_gapfilled = true;
        reaction.gapfill_method = Some(method.to_string());
        self.gf_reactions.insert(
            reaction_id.to_string(),
            GapfillProvenance {
                method: method.to_string(),
                media: media.to_string(),
            },
        );
        Ok(())
    }
}

#[derive(Clone, Debug, Error)]
pub enum ModelError {
    #[error("Reaction '{0}' is not in the model's reaction set")]
    UnknownReaction(String),
}
