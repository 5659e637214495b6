//! SBML export for Models
//!
//! Writes a model as an SBML Level 3 Version 1 Core (Release 2) document,
//! the one-way exchange format consumed by downstream flux balance analysis
//! tools. The document carries one flux-rate unit definition, the two fixed
//! compartments c0 and e0, one species per referenced compound, and every
//! reaction with KBase-style flux bound parameters on its kinetic law. The
//! biomass reaction is emitted last and is the sole optimization objective.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::configuration::CONFIGURATION;
use crate::metabolic_model::compound::Compound;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{Direction, Reaction};

const SBML_NS: &str = "http://www.sbml.org/sbml/level3/version1/core";
const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";
const FLUX_UNITS: &str = "mmol_per_gDW_per_hr";

/// Save the model as `<model-name>.xml` under `out_dir`, or under the
/// explicit `file_name` if one is given
///
/// Both a document construction failure and a failed write are fatal; no
/// partial document is left behind as a valid export.
pub fn save_sbml(
    model: &Model,
    out_dir: &Path,
    file_name: Option<&str>,
) -> Result<PathBuf, SbmlError> {
    let document = build_document(model)?;
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let mut serializer = quick_xml::se::Serializer::new(&mut xml);
    serializer.indent(' ', 2);
    document.serialize(serializer)?;

    let path = match file_name {
        Some(file_name) => out_dir.join(file_name),
        None => out_dir.join(format!("{}.xml", model.name)),
    };
    fs::write(&path, xml).map_err(|source| SbmlError::Write {
        path: path.clone(),
        source,
    })?;
    info!("Saved model successfully to file: {}", path.display());
    Ok(path)
}

// region Document construction

fn build_document(model: &Model) -> Result<SbmlDocument, SbmlError> {
    let biomass = model
        .biomass_reaction
        .as_ref()
        .ok_or(SbmlError::MissingBiomass)?;
    let (lower_bound, upper_bound) = {
        let configuration = CONFIGURATION.read().unwrap();
        (configuration.lower_bound, configuration.upper_bound)
    };

    // One species per compound in the model, then any compounds the biomass
    // equation references that were not emitted already
    let mut species: Vec<SbmlSpecies> = model.compounds.iter().map(species_entry).collect();
    let mut biomass_only: IndexSet<&Compound> = IndexSet::new();
    for compound in biomass.compounds() {
        if !model.has_compound(compound) && biomass_only.insert(compound) {
            species.push(species_entry(compound));
        }
    }

    let mut reactions: Vec<SbmlReaction> = model
        .reactions
        .iter()
        .map(|(id, reaction)| reaction_entry(id, reaction, lower_bound, upper_bound))
        .collect();
    reactions.push(biomass_entry(biomass, upper_bound));

    Ok(SbmlDocument {
        xmlns: SBML_NS.to_string(),
        level: 3,
        version: 1,
        model: SbmlModel {
            id: model.id.clone(),
            name: model.name.clone(),
            unit_definitions: UnitDefinitionList {
                unit_definitions: vec![flux_rate_units()],
            },
            compartments: CompartmentList {
                compartments: ["c0", "e0"]
                    .into_iter()
                    .map(|id| SbmlCompartment {
                        id: id.to_string(),
                        name: id.to_string(),
                        constant: true,
                    })
                    .collect(),
            },
            species: SpeciesList { species },
            reactions: ReactionList { reactions },
        },
    })
}

/// The flux rate unit: mmol per gram dry weight per hour, with the hour
/// expressed in seconds via the multiplier
fn flux_rate_units() -> SbmlUnitDefinition {
    let unit = |kind: &str, exponent: i32, scale: i32, multiplier: f64| SbmlUnit {
        kind: kind.to_string(),
        exponent,
        scale,
        multiplier,
    };
    SbmlUnitDefinition {
        id: FLUX_UNITS.to_string(),
        units: UnitList {
            units: vec![
                unit("mole", 1, -3, 1.0),
                unit("gram", -1, 0, 1.0),
                unit("second", -1, 0, 1.0 / 3600.0),
            ],
        },
    }
}

fn species_id(compound: &Compound) -> String {
    format!("{}_{}0", compound.seed_id, compound.location)
}

fn species_entry(compound: &Compound) -> SbmlSpecies {
    SbmlSpecies {
        id: species_id(compound),
        name: compound.name.clone(),
        compartment: format!("{}0", compound.location),
        has_only_substance_units: false,
        boundary_condition: false,
        constant: false,
    }
}

fn species_reference(compound: &Compound, abundance: f64) -> SbmlSpeciesReference {
    SbmlSpeciesReference {
        species: species_id(compound),
        // Sign is carried by the reactant/product role
        stoichiometry: abundance.abs(),
        constant: true,
    }
}

/// Split a reaction's left and right operands into reactants and products
///
/// Forward and reversible reactions read left to right; a reverse-only
/// reaction runs the other way, so its roles invert while its reversibility
/// flag stays false.
fn split_operands(reaction: &Reaction) -> (Vec<SbmlSpeciesReference>, Vec<SbmlSpeciesReference>) {
    let mut reactants = Vec::new();
    let mut products = Vec::new();
    for (compound, abundance) in &reaction.left_abundance {
        let reference = species_reference(compound, *abundance);
        match reaction.direction {
            Direction::Forward | Direction::Reversible => reactants.push(reference),
            Direction::Reverse => products.push(reference),
        }
    }
    for (compound, abundance) in &reaction.right_abundance {
        let reference = species_reference(compound, *abundance);
        match reaction.direction {
            Direction::Forward | Direction::Reversible => products.push(reference),
            Direction::Reverse => reactants.push(reference),
        }
    }
    (reactants, products)
}

fn reaction_entry(
    id: &str,
    reaction: &Reaction,
    lower_bound: f64,
    upper_bound: f64,
) -> SbmlReaction {
    let (reactants, products) = split_operands(reaction);
    SbmlReaction {
        id: id.to_string(),
        name: reaction.name.clone().unwrap_or_else(|| id.to_string()),
        reversible: reaction.direction == Direction::Reversible,
        fast: false,
        reactants: SpeciesReferenceList::wrap(reactants),
        products: SpeciesReferenceList::wrap(products),
        kinetic_law: kinetic_law(lower_bound, upper_bound, 0.0),
    }
}

/// The biomass reaction is directionally fixed left to right, carries a zero
/// lower bound, and is the only reaction with a nonzero objective
fn biomass_entry(biomass: &Reaction, upper_bound: f64) -> SbmlReaction {
    let reactants = biomass
        .left_abundance
        .iter()
        .map(|(compound, abundance)| species_reference(compound, *abundance))
        .collect();
    let products = biomass
        .right_abundance
        .iter()
        .map(|(compound, abundance)| species_reference(compound, *abundance))
        .collect();
    SbmlReaction {
        id: "biomass".to_string(),
        name: "biomass".to_string(),
        reversible: false,
        fast: false,
        reactants: SpeciesReferenceList::wrap(reactants),
        products: SpeciesReferenceList::wrap(products),
        kinetic_law: kinetic_law(0.0, upper_bound, 1.0),
    }
}

fn kinetic_law(lower_bound: f64, upper_bound: f64, objective: f64) -> SbmlKineticLaw {
    let parameter = |id: &str, name: Option<&str>, value: f64| SbmlLocalParameter {
        id: id.to_string(),
        name: name.map(str::to_string),
        value,
    };
    SbmlKineticLaw {
        math: SbmlMath {
            xmlns: MATHML_NS.to_string(),
            ci: " FLUX_VALUE ".to_string(),
        },
        parameters: LocalParameterList {
            parameters: vec![
                parameter("LOWER_BOUND", Some(FLUX_UNITS), lower_bound),
                parameter("UPPER_BOUND", Some(FLUX_UNITS), upper_bound),
                parameter("FLUX_VALUE", Some(FLUX_UNITS), 0.0),
                parameter("OBJECTIVE_COEFFICIENT", None, objective),
            ],
        },
    }
}

// endregion Document construction

// region SBML document structs

#[derive(Serialize)]
#[serde(rename = "sbml")]
struct SbmlDocument {
    #[serde(rename = "@xmlns")]
    xmlns: String,
    #[serde(rename = "@level")]
    level: u32,
    #[serde(rename = "@version")]
    version: u32,
    model: SbmlModel,
}

#[derive(Serialize)]
struct SbmlModel {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "listOfUnitDefinitions")]
    unit_definitions: UnitDefinitionList,
    #[serde(rename = "listOfCompartments")]
    compartments: CompartmentList,
    #[serde(rename = "listOfSpecies")]
    species: SpeciesList,
    #[serde(rename = "listOfReactions")]
    reactions: ReactionList,
}

#[derive(Serialize)]
struct UnitDefinitionList {
    #[serde(rename = "unitDefinition")]
    unit_definitions: Vec<SbmlUnitDefinition>,
}

#[derive(Serialize)]
struct SbmlUnitDefinition {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "listOfUnits")]
    units: UnitList,
}

#[derive(Serialize)]
struct UnitList {
    #[serde(rename = "unit")]
    units: Vec<SbmlUnit>,
}

#[derive(Serialize)]
struct SbmlUnit {
    #[serde(rename = "@kind")]
    kind: String,
    #[serde(rename = "@exponent")]
    exponent: i32,
    #[serde(rename = "@scale")]
    scale: i32,
    #[serde(rename = "@multiplier")]
    multiplier: f64,
}

#[derive(Serialize)]
struct CompartmentList {
    #[serde(rename = "compartment")]
    compartments: Vec<SbmlCompartment>,
}

#[derive(Serialize)]
struct SbmlCompartment {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@constant")]
    constant: bool,
}

#[derive(Serialize)]
struct SpeciesList {
    #[serde(rename = "species")]
    species: Vec<SbmlSpecies>,
}

#[derive(Serialize)]
struct SbmlSpecies {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@compartment")]
    compartment: String,
    #[serde(rename = "@hasOnlySubstanceUnits")]
    has_only_substance_units: bool,
    #[serde(rename = "@boundaryCondition")]
    boundary_condition: bool,
    #[serde(rename = "@constant")]
    constant: bool,
}

#[derive(Serialize)]
struct ReactionList {
    #[serde(rename = "reaction")]
    reactions: Vec<SbmlReaction>,
}

#[derive(Serialize)]
struct SbmlReaction {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@reversible")]
    reversible: bool,
    #[serde(rename = "@fast")]
    fast: bool,
    #[serde(rename = "listOfReactants", skip_serializing_if = "Option::is_none")]
    reactants: Option<SpeciesReferenceList>,
    #[serde(rename = "listOfProducts", skip_serializing_if = "Option::is_none")]
    products: Option<SpeciesReferenceList>,
    #[serde(rename = "kineticLaw")]
    kinetic_law: SbmlKineticLaw,
}

#[derive(Serialize)]
struct SpeciesReferenceList {
    #[serde(rename = "speciesReference")]
    references: Vec<SbmlSpeciesReference>,
}

impl SpeciesReferenceList {
    /// An empty operand list is omitted from the document entirely
    fn wrap(references: Vec<SbmlSpeciesReference>) -> Option<Self> {
        if references.is_empty() {
            None
        } else {
            Some(SpeciesReferenceList { references })
        }
    }
}

#[derive(Serialize)]
struct SbmlSpeciesReference {
    #[serde(rename = "@species")]
    species: String,
    #[serde(rename = "@stoichiometry")]
    stoichiometry: f64,
    #[serde(rename = "@constant")]
    constant: bool,
}

#[derive(Serialize)]
struct SbmlKineticLaw {
    math: SbmlMath,
    #[serde(rename = "listOfLocalParameters")]
    parameters: LocalParameterList,
}

#[derive(Serialize)]
struct SbmlMath {
    #[serde(rename = "@xmlns")]
    xmlns: String,
    ci: String,
}

#[derive(Serialize)]
struct LocalParameterList {
    #[serde(rename = "localParameter")]
    parameters: Vec<SbmlLocalParameter>,
}

#[derive(Serialize)]
struct SbmlLocalParameter {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@name", skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "@value")]
    value: f64,
}

// endregion SBML document structs

#[derive(Debug, Error)]
pub enum SbmlError {
    #[error("Model has no biomass reaction to export")]
    MissingBiomass,
    #[error("Unable to serialize the SBML document: {0}")]
    Serialize(#[from] quick_xml::SeError),
    #[error("Unable to write SBML file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
