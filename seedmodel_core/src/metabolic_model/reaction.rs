//! This module provides a struct for representing reactions

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use derive_builder::Builder;
use indexmap::IndexMap;
use thiserror::Error;

use crate::metabolic_model::compound::Compound;

/// Direction a reaction can run in
///
/// Left and right abundances are stored as written in the source equation,
/// so a reverse-only reaction runs from its right side to its left side.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Direction {
    /// Runs left to right only
    Forward,
    /// Runs right to left only
    Reverse,
    /// Runs in both directions
    Reversible,
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Direction::Forward => ">",
            Direction::Reverse => "<",
            Direction::Reversible => "=",
        };
        write!(f, "{}", symbol)
    }
}

impl FromStr for Direction {
    type Err = DirectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">" => Ok(Direction::Forward),
            "<" => Ok(Direction::Reverse),
            "=" => Ok(Direction::Reversible),
            other => Err(DirectionParseError(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, Error)]
#[error("Invalid reaction direction '{0}', expected '>', '<' or '='")]
pub struct DirectionParseError(String);

/// Represents a reaction in the metabolic model
#[derive(Builder, Debug, Clone)]
pub struct Reaction {
    /// Used to identify the reaction
    pub id: String,
    /// Human-readable reaction name
    #[builder(default = "None")]
    pub name: Option<String>,
    /// Direction the reaction runs in
    #[builder(default = "Direction::Reversible")]
    pub direction: Direction,
    /// Stoichiometry of the compounds on the left side of the equation
    #[builder(default = "IndexMap::new()")]
    pub left_abundance: IndexMap<Compound, f64>,
    /// Stoichiometry of the compounds on the right side of the equation
    #[builder(default = "IndexMap::new()")]
    pub right_abundance: IndexMap<Compound, f64>,
    /// Whether this reaction was added to a model by gap-filling
    #[builder(default = "false")]
    pub is_gapfilled: bool,
    /// Which gap-filling step proposed this reaction
    #[builder(default = "None")]
    pub gapfill_method: Option<String>,
}

impl Reaction {
    /// Is this compound involved in this reaction, on either side?
    pub fn has_compound(&self, compound: &Compound) -> bool {
        self.left_abundance.contains_key(compound) || self.right_abundance.contains_key(compound)
    }

    /// Iterate over the compounds on both sides of the reaction
    pub fn compounds(&self) -> impl Iterator<Item = &Compound> {
        self.left_abundance.keys().chain(self.right_abundance.keys())
    }
}

// Reactions are identified by their id alone, so they can live in sets
impl PartialEq for Reaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Reaction {}

impl Hash for Reaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Display for Reaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}
