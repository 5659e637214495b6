//! Assembling a model from a functional-role annotation file

use std::path::Path;

use indexmap::{indexmap, indexset, IndexSet};
use log::warn;
use thiserror::Error;

use crate::io::annotation::{read_assigned_functions, AnnotationError};
use crate::metabolic_model::model::Model;
use crate::reference::{DatabaseError, DatabaseSource};

/// Build a model from an assigned-functions annotation file
///
/// Every role asserted for any feature is resolved to candidate reaction ids
/// through the reference database's role lookup. A looked-up reaction id the
/// database does not actually carry is skipped with a warning; the role
/// lookup table and the reaction catalog evolve independently, so the
/// occasional dangling id is expected. The returned model always carries the
/// organism-type biomass equation, even when no roles resolved.
pub fn roles_to_model<P: AsRef<Path>>(
    roles_file: P,
    id: &str,
    name: &str,
    organism_type: &str,
    source: &dyn DatabaseSource,
) -> Result<Model, BuildError> {
    let database = source.load(organism_type)?;

    // Union all asserted roles into one deduplicated set
    let assigned_functions = read_assigned_functions(roles_file)?;
    let mut roles: IndexSet<String> = IndexSet::new();
    for feature_roles in assigned_functions.values() {
        roles.extend(feature_roles.iter().cloned());
    }

    let mut model = Model::new(id, name, organism_type);
    for role in &roles {
        let Some(reaction_ids) = database.reactions_for_role(role) else {
            continue;
        };
        for reaction_id in reaction_ids {
            match database.reactions.get(reaction_id) {
                Some(reaction) => {
                    model.add_reactions(indexset! {reaction.clone()});
                    model.add_roles(indexmap! {
                        role.clone() => indexset! {reaction_id.clone()},
                    });
                }
                None => warn!(
                    "Reaction ID '{}' for role '{}' is not in our reactions list. Skipped.",
                    reaction_id, role
                ),
            }
        }
    }

    model.set_biomass_reaction(database.biomass_equation());
    Ok(model)
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

#[cfg(test)]
mod build_tests {
    use super::*;
    use crate::metabolic_model::compound::Compound;
    use crate::metabolic_model::reaction::{Direction, Reaction, ReactionBuilder};
    use crate::reference::ReferenceDatabase;
    use indexmap::IndexMap;
    use std::io::Write;

    fn reaction(id: &str, left: &str, right: &str) -> Reaction {
        ReactionBuilder::default()
            .id(id.to_string())
            .direction(Direction::Forward)
            .left_abundance(indexmap! {Compound::new(left, "c") => 1.0})
            .right_abundance(indexmap! {Compound::new(right, "c") => 1.0})
            .build()
            .unwrap()
    }

    struct InMemorySource {
        database: ReferenceDatabase,
    }

    impl DatabaseSource for InMemorySource {
        fn load(&self, organism_type: &str) -> Result<ReferenceDatabase, DatabaseError> {
            if organism_type == self.database.organism_type {
                Ok(self.database.clone())
            } else {
                Err(DatabaseError::UnknownOrganismType(organism_type.to_string()))
            }
        }
    }

    fn test_source() -> InMemorySource {
        InMemorySource {
            database: ReferenceDatabase {
                organism_type: "gramnegative".to_string(),
                compounds: IndexMap::new(),
                reactions: indexmap! {
                    "rxn00001".to_string() => reaction("rxn00001", "A", "B"),
                    "rxn00002".to_string() => reaction("rxn00002", "B", "C"),
                },
                enzymes: IndexMap::new(),
                role_reactions: indexmap! {
                    "Enolase (EC 4.2.1.11)".to_string() =>
                        indexset! {"rxn00001".to_string(), "rxn00002".to_string()},
                    // Points at a reaction the catalog no longer carries
                    "Orphan role".to_string() => indexset! {"rxn99999".to_string()},
                },
                biomass: reaction("biomass_equation", "C", "Biomass"),
            },
        }
    }

    fn annotation_file(lines: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file
    }

    #[test]
    fn assembles_reactions_and_roles_from_annotations() {
        let file = annotation_file(&[
            "fig|83333.1.peg.1\tEnolase (EC 4.2.1.11)",
            "fig|83333.1.peg.2\tEnolase (EC 4.2.1.11)",
        ]);
        let model = roles_to_model(
            file.path(),
            "m1",
            "citrobacter",
            "gramnegative",
            &test_source(),
        )
        .unwrap();

        assert_eq!(model.id, "m1");
        assert_eq!(model.organism_type, "gramnegative");
        assert_eq!(
            model.reactions.keys().collect::<Vec<_>>(),
            vec!["rxn00001", "rxn00002"]
        );
        assert_eq!(
            model.roles["Enolase (EC 4.2.1.11)"],
            indexset! {"rxn00001".to_string(), "rxn00002".to_string()}
        );
        assert!(model.has_compound(&Compound::new("B", "c")));
        assert_eq!(model.biomass_reaction.unwrap().id, "biomass_equation");
    }

    #[test]
    fn dangling_reaction_ids_are_skipped_without_failing() {
        let file = annotation_file(&["fig|83333.1.peg.1\tOrphan role"]);
        let model = roles_to_model(
            file.path(),
            "m1",
            "citrobacter",
            "gramnegative",
            &test_source(),
        )
        .unwrap();
        assert!(model.reactions.is_empty());
        assert!(!model.roles.contains_key("Orphan role"));
        // The biomass equation is attached regardless
        assert!(model.biomass_reaction.is_some());
    }

    #[test]
    fn unknown_roles_resolve_to_nothing() {
        let file = annotation_file(&["fig|83333.1.peg.1\tA role nobody mapped"]);
        let model = roles_to_model(
            file.path(),
            "m1",
            "citrobacter",
            "gramnegative",
            &test_source(),
        )
        .unwrap();
        assert!(model.reactions.is_empty());
        assert!(model.roles.is_empty());
    }

    #[test]
    fn unknown_organism_type_is_an_error() {
        let file = annotation_file(&["fig|83333.1.peg.1\tEnolase (EC 4.2.1.11)"]);
        let result = roles_to_model(file.path(), "m1", "citrobacter", "archaea", &test_source());
        assert!(matches!(result, Err(BuildError::Database(_))));
    }
}
