//! Reader for gap-fill result tables
//!
//! A gap-fill run leaves one tab-delimited table per media, each with a
//! header line and the proposed reaction id in the first column. This reads
//! a whole results directory into one deduplicated id set, ready to resolve
//! against the reference database.

use std::fs;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexSet;
use thiserror::Error;

/// Collect the reaction ids proposed by every table in a results directory
pub fn read_gapfilled_reactions<P: AsRef<Path>>(
    gf_dir: P,
) -> Result<IndexSet<String>, GapfillError> {
    let gf_dir = gf_dir.as_ref();
    if !gf_dir.is_dir() {
        return Err(GapfillError::NotADirectory(gf_dir.display().to_string()));
    }
    let mut reactions = IndexSet::new();
    for entry in fs::read_dir(gf_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let reader = BufReader::new(File::open(entry.path())?);
        // First line of every table is a header
        for line in reader.lines().skip(1) {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(reaction_id) = line.split('\t').next() {
                reactions.insert(reaction_id.to_string());
            }
        }
    }
    Ok(reactions)
}

#[derive(Debug, Error)]
pub enum GapfillError {
    #[error("Gap-fill results directory '{0}' does not exist")]
    NotADirectory(String),
    #[error("Unable to read gap-fill results: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod gapfill_tests {
    use super::*;
    use indexmap::indexset;

    #[test]
    fn collects_first_columns_and_skips_headers() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("ArgonneLB.tsv"),
            "reaction\tstep\nrxn00001\tessential\nrxn00002\tprobability\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("MOPS.tsv"),
            "reaction\tstep\nrxn00002\tessential\nrxn00003\tessential\n",
        )
        .unwrap();
        let reactions = read_gapfilled_reactions(dir.path()).unwrap();
        assert_eq!(
            reactions,
            indexset! {
                "rxn00001".to_string(),
                "rxn00002".to_string(),
                "rxn00003".to_string(),
            }
        );
    }

    #[test]
    fn missing_directory_is_an_error() {
        let result = read_gapfilled_reactions("/no/such/gapfill/dir");
        assert!(matches!(result, Err(GapfillError::NotADirectory(_))));
    }
}
