//! Parser for assigned-functions annotation files
//!
//! A RAST annotation file maps one genome feature per line to a free-text
//! function, tab separated. A function string may assert several roles at
//! once; those are split apart here so downstream lookups see single roles.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::{IndexMap, IndexSet};
use log::warn;
use thiserror::Error;

/// Separators RAST uses to join multiple roles into one function string
const ROLE_SEPARATORS: [&str; 3] = [" / ", " @ ", "; "];

/// Read an assigned-functions file into a feature to role-set mapping
///
/// Repeated features union their role sets. Blank lines and lines starting
/// with '#' are ignored; a line without a tab separator is skipped with a
/// warning.
pub fn read_assigned_functions<P: AsRef<Path>>(
    path: P,
) -> Result<IndexMap<String, IndexSet<String>>, AnnotationError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    let mut assigned: IndexMap<String, IndexSet<String>> = IndexMap::new();
    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((feature, function)) = line.split_once('\t') else {
            warn!(
                "Skipping line {} of {}: no tab between feature and function",
                line_number + 1,
                path.as_ref().display()
            );
            continue;
        };
        assigned
            .entry(feature.to_string())
            .or_default()
            .extend(split_roles(function));
    }
    Ok(assigned)
}

/// Split a function string into its individual roles
///
/// Trailing comments introduced with " #" or " !" are dropped first.
pub fn split_roles(function: &str) -> IndexSet<String> {
    let mut function = function;
    for comment in [" #", " !"] {
        if let Some(at) = function.find(comment) {
            function = &function[..at];
        }
    }
    let mut roles = vec![function.to_string()];
    for separator in ROLE_SEPARATORS {
        roles = roles
            .iter()
            .flat_map(|role| role.split(separator))
            .map(str::to_string)
            .collect();
    }
    roles
        .into_iter()
        .map(|role| role.trim().to_string())
        .filter(|role| !role.is_empty())
        .collect()
}

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("Unable to read the annotation file: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod annotation_tests {
    use super::*;
    use indexmap::indexset;
    use std::io::Write;

    #[test]
    fn splits_multifunctional_annotations() {
        let roles = split_roles(
            "Chorismate mutase I (EC 5.4.99.5) / Prephenate dehydratase (EC 4.2.1.51)",
        );
        assert_eq!(
            roles,
            indexset! {
                "Chorismate mutase I (EC 5.4.99.5)".to_string(),
                "Prephenate dehydratase (EC 4.2.1.51)".to_string(),
            }
        );
    }

    #[test]
    fn strips_trailing_comments() {
        let roles = split_roles("Enolase (EC 4.2.1.11) # from blast hit");
        assert_eq!(roles, indexset! {"Enolase (EC 4.2.1.11)".to_string()});
    }

    #[test]
    fn reads_and_unions_features() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "fig|83333.1.peg.1\tEnolase (EC 4.2.1.11)").unwrap();
        writeln!(file, "fig|83333.1.peg.2\tEnolase (EC 4.2.1.11); Mutase").unwrap();
        writeln!(file, "fig|83333.1.peg.2\tPyruvate kinase (EC 2.7.1.40)").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "# a comment line").unwrap();
        writeln!(file, "a line without any tab").unwrap();
        let assigned = read_assigned_functions(file.path()).unwrap();
        assert_eq!(assigned.len(), 2);
        assert_eq!(
            assigned["fig|83333.1.peg.2"],
            indexset! {
                "Enolase (EC 4.2.1.11)".to_string(),
                "Mutase".to_string(),
                "Pyruvate kinase (EC 2.7.1.40)".to_string(),
            }
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_assigned_functions("/no/such/annotation/file").is_err());
    }
}
