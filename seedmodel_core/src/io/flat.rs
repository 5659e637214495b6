//! Flat-file persistence for Models
//!
//! A model is stored as six delimited text files in one directory, all
//! sharing the model name as a prefix:
//!
//! | suffix         | content                                              |
//! |----------------|------------------------------------------------------|
//! | `.info`        | `key\tvalue` lines: id, name, organism_type, created_on |
//! | `.roles`       | one line per role: `role\trxn_id;rxn_id;...`         |
//! | `.reactions`   | one reaction id per line                             |
//! | `.compounds`   | one compound per line, display form (audit only)     |
//! | `.gfmedia`     | one gap-filled media label per line                  |
//! | `.gfreactions` | one line per gap-filled reaction: `rxn\tmethod\tmedia` |
//!
//! The field order and the tab/semicolon delimiters are a stable on-disk
//! contract. Loading rebuilds the reaction set from the reference database
//! for the recorded organism type, recomputes the compound set from the
//! reloaded reactions (the `.compounds` file is never read back), and
//! re-attaches the organism-type biomass equation.

use std::fs;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::Local;
use indexmap::{IndexMap, IndexSet};
use log::warn;
use thiserror::Error;

use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::Reaction;
use crate::reference::{DatabaseError, DatabaseSource};

/// Save all model information as flat files under `out_dir`
///
/// The directory is created if missing, including intermediate directories;
/// an existing directory is reused.
pub fn save_model<P: AsRef<Path>>(model: &Model, out_dir: P) -> Result<(), FlatError> {
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;
    let prefix = &model.name;

    let mut info = BufWriter::new(File::create(out_dir.join(format!("{}.info", prefix)))?);
    writeln!(info, "id\t{}", model.id)?;
    writeln!(info, "name\t{}", model.name)?;
    writeln!(info, "organism_type\t{}", model.organism_type)?;
    // Stored for reference only, not read back
    write!(info, "created_on\t{}", Local::now().to_rfc3339())?;
    info.flush()?;

    let mut roles = BufWriter::new(File::create(out_dir.join(format!("{}.roles", prefix)))?);
    for (role, reaction_ids) in &model.roles {
        let ids: Vec<&str> = reaction_ids.iter().map(String::as_str).collect();
        writeln!(roles, "{}\t{}", role, ids.join(";"))?;
    }
    roles.flush()?;

    let mut reactions =
        BufWriter::new(File::create(out_dir.join(format!("{}.reactions", prefix)))?);
    for reaction_id in model.reactions.keys() {
        writeln!(reactions, "{}", reaction_id)?;
    }
    reactions.flush()?;

    let mut compounds =
        BufWriter::new(File::create(out_dir.join(format!("{}.compounds", prefix)))?);
    for compound in &model.compounds {
        writeln!(compounds, "{}", compound)?;
    }
    compounds.flush()?;

    let mut media = BufWriter::new(File::create(out_dir.join(format!("{}.gfmedia", prefix)))?);
    for label in &model.gapfilled_media {
        writeln!(media, "{}", label)?;
    }
    media.flush()?;

    let mut gapfilled =
        BufWriter::new(File::create(out_dir.join(format!("{}.gfreactions", prefix)))?);
    for (reaction_id, provenance) in &model.gf_reactions {
        writeln!(
            gapfilled,
            "{}\t{}\t{}",
            reaction_id, provenance.method, provenance.media
        )?;
    }
    gapfilled.flush()?;

    Ok(())
}

/// Load a model previously written by [`save_model`]
///
/// Reaction ids are resolved against the reference database the source
/// loads for the recorded organism type; an id the database no longer knows
/// is skipped with a warning, as is gap-fill provenance for a reaction that
/// did not survive the reload. Missing id, name or organism_type in the
/// `.info` file is a hard failure.
pub fn load_model<P: AsRef<Path>>(
    in_dir: P,
    prefix: &str,
    source: &dyn DatabaseSource,
) -> Result<Model, FlatError> {
    let in_dir = in_dir.as_ref();

    let mut id = None;
    let mut name = None;
    let mut organism_type = None;
    let info = BufReader::new(File::open(in_dir.join(format!("{}.info", prefix)))?);
    for line in info.lines() {
        let line = line?;
        let Some((key, value)) = line.split_once('\t') else {
            continue;
        };
        match key {
            "id" => id = Some(value.to_string()),
            "name" => name = Some(value.to_string()),
            "organism_type" => organism_type = Some(value.to_string()),
            // created_on is stored for reference only
            _ => {}
        }
    }
    let id = id.ok_or(FlatError::MissingInfoField("id"))?;
    let name = name.ok_or(FlatError::MissingInfoField("name"))?;
    let organism_type = organism_type.ok_or(FlatError::MissingInfoField("organism_type"))?;

    let mut roles: IndexMap<String, IndexSet<String>> = IndexMap::new();
    let roles_file = format!("{}.roles", prefix);
    let reader = BufReader::new(File::open(in_dir.join(&roles_file))?);
    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let (role, reaction_ids) = line.split_once('\t').ok_or(FlatError::MalformedLine {
            file: roles_file.clone(),
            line: line_number + 1,
        })?;
        roles.insert(
            role.to_string(),
            reaction_ids.split(';').map(str::to_string).collect(),
        );
    }

    let database = source.load(&organism_type)?;

    let mut reactions: IndexSet<Reaction> = IndexSet::new();
    let reader = BufReader::new(File::open(in_dir.join(format!("{}.reactions", prefix)))?);
    for line in reader.lines() {
        let reaction_id = line?;
        if reaction_id.is_empty() {
            continue;
        }
        match database.reactions.get(&reaction_id) {
            Some(reaction) => {
                reactions.insert(reaction.clone());
            }
            None => warn!(
                "Reaction {} was not found in the database. Skipping.",
                reaction_id
            ),
        }
    }

    let mut gapfilled_media: IndexSet<String> = IndexSet::new();
    let reader = BufReader::new(File::open(in_dir.join(format!("{}.gfmedia", prefix)))?);
    for line in reader.lines() {
        let label = line?;
        if !label.is_empty() {
            gapfilled_media.insert(label);
        }
    }

    let gf_file = format!("{}.gfreactions", prefix);
    let mut gapfills: Vec<(String, String, String)> = Vec::new();
    let reader = BufReader::new(File::open(in_dir.join(&gf_file))?);
    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let mut fields = line.splitn(3, '\t');
        match (fields.next(), fields.next(), fields.next()) {
            (Some(reaction_id), Some(method), Some(media)) => gapfills.push((
                reaction_id.to_string(),
                method.to_string(),
                media.to_string(),
            )),
            _ => {
                return Err(FlatError::MalformedLine {
                    file: gf_file,
                    line: line_number + 1,
                })
            }
        }
    }

    let mut model = Model::new(&id, &name, &organism_type);
    model.add_reactions(reactions);
    model.add_roles(roles);
    model.gapfilled_media = gapfilled_media;
    for (reaction_id, method, media) in gapfills {
        if model.record_gapfill(&reaction_id, &method, &media).is_err() {
            warn!(
                "Gap-filled reaction {} is not in the reloaded model. Skipping its provenance.",
                reaction_id
            );
        }
    }
    model.set_biomass_reaction(database.biomass_equation());
    Ok(model)
}

#[derive(Debug, Error)]
pub enum FlatError {
    #[error("Unable to read or write model files: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing required field '{0}' in the .info file")]
    MissingInfoField(&'static str),
    #[error("Malformed line {line} in {file}")]
    MalformedLine { file: String, line: usize },
    #[error(transparent)]
    Database(#[from] DatabaseError),
}
