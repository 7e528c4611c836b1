//! Common routines for handling input data.
use crate::scenario::Scenario;
use crate::units::Dimensionless;
use anyhow::{Context, Result, ensure};
use log::info;
use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use std::fs;
use std::path::Path;

pub mod case;
use case::read_case_file;
pub mod results;
use results::{read_grid_availability, read_results};

/// Read a series of type `T`s from a CSV file.
///
/// # Arguments
///
/// * `file_path` - Path to the CSV file
///
/// # Returns
///
/// An iterator of `T`s or an error if the file could not be opened or is empty.
pub fn read_csv<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    let vec = read_csv_internal(file_path)?;
    ensure!(!vec.is_empty(), "CSV file {} cannot be empty", file_path.display());

    Ok(vec.into_iter())
}

/// Read a series of type `T`s from a CSV file, returning an empty iterator if the file is absent.
pub fn read_csv_optional<'a, T: DeserializeOwned + 'a>(
    file_path: &'a Path,
) -> Result<impl Iterator<Item = T> + 'a> {
    if !file_path.exists() {
        return Ok(Vec::new().into_iter());
    }

    Ok(read_csv_internal(file_path)?.into_iter())
}

fn read_csv_internal<T: DeserializeOwned>(file_path: &Path) -> Result<Vec<T>> {
    let vec = csv::Reader::from_path(file_path)
        .with_context(|| input_err_msg(file_path))?
        .into_deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .with_context(|| input_err_msg(file_path))?;

    Ok(vec)
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Format an error message to include the file path
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Read a [`Dimensionless`] value, checking that it is between 0 and 1
pub fn deserialise_proportion<'de, D>(deserialiser: D) -> Result<Dimensionless, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = Deserialize::deserialize(deserialiser)?;
    if !(0.0..=1.0).contains(&value) {
        Err(serde::de::Error::custom("Value must be between 0 and 1"))?;
    }

    Ok(Dimensionless(value))
}

/// Check whether a slice is sorted in strictly ascending order (i.e. no duplicates)
pub fn is_sorted_and_unique<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

/// Load a case from the specified directory.
///
/// # Arguments
///
/// * `case_dir` - Folder containing the case configuration and solver results
///
/// # Returns
///
/// The case configuration, experiment parameters and solver results in a [`Scenario`].
pub fn load_scenario<P: AsRef<Path>>(case_dir: P) -> Result<Scenario> {
    let case_dir = case_dir.as_ref();
    let (case, experiment) = read_case_file(case_dir)?;
    let results = read_results(case_dir)?;
    let grid_availability = read_grid_availability(case_dir)?;
    info!(
        "Read {} sequences and {} scalars",
        results.num_sequences(),
        results.num_scalars()
    );

    Ok(Scenario {
        case_path: case_dir.to_path_buf(),
        case,
        experiment,
        results,
        grid_availability,
    })
}
