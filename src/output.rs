//! The module responsible for writing output data to disk.
use crate::evaluate::Evaluation;
use crate::flows::FlowTable;
use crate::metrics::Metrics;
use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

pub mod metadata;
use metadata::write_metadata;

/// The root folder in which case-specific output folders will be created
const OUTPUT_DIRECTORY_ROOT: &str = "mgeval_results";

/// The output file name for the flow table
const FLOWS_FILE_NAME: &str = "flows.csv";

/// The output file name for metrics
const METRICS_FILE_NAME: &str = "metrics.csv";

/// The format used for timesteps in output files
const TIMESTEP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Get the default output directory for the case at the specified path
pub fn get_output_dir(case_dir: &Path) -> Result<PathBuf> {
    // Canonicalise in case the user has specified "."
    let case_dir = case_dir
        .canonicalize()
        .context("Could not resolve path to case")?;

    let case_name = case_dir
        .file_name()
        .context("Case cannot be in root folder")?
        .to_str()
        .context("Invalid chars in case dir name")?;

    Ok([OUTPUT_DIRECTORY_ROOT, case_name].iter().collect())
}

/// Create a new output directory, optionally overwriting an existing one.
///
/// # Returns
///
/// `true` if an existing folder with contents was overwritten, `false` otherwise, or an error if
/// the folder has contents and `allow_overwrite` is false.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    if output_dir.is_dir() {
        if fs::read_dir(output_dir)?.next().is_none() {
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. Use --overwrite or set overwrite = \
            true in the settings file to overwrite it."
        );

        fs::remove_dir_all(output_dir)?;
        fs::create_dir_all(output_dir)?;
        return Ok(true);
    }

    fs::create_dir_all(output_dir)?;
    Ok(false)
}

/// Represents a row in the metrics CSV file
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct MetricRow {
    metric: String,
    value: f64,
}

/// An object for writing evaluation results to file
pub struct DataWriter {
    flows_writer: csv::Writer<File>,
    metrics_writer: csv::Writer<File>,
}

impl DataWriter {
    /// Open CSV files to write output data to
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    pub fn create(output_path: &Path) -> Result<Self> {
        let new_writer = |file_name| {
            let file_path = output_path.join(file_name);
            csv::Writer::from_path(file_path)
        };

        Ok(Self {
            flows_writer: new_writer(FLOWS_FILE_NAME)?,
            metrics_writer: new_writer(METRICS_FILE_NAME)?,
        })
    }

    /// Write the flow table, one row per timestep
    pub fn write_flows(&mut self, flows: &FlowTable) -> Result<()> {
        let header = std::iter::once("timestep").chain(flows.column_names());
        self.flows_writer.write_record(header)?;

        for (timestep, values) in flows.iter_rows() {
            let record = std::iter::once(timestep.format(TIMESTEP_FORMAT).to_string())
                .chain(values.iter().map(ToString::to_string));
            self.flows_writer.write_record(record)?;
        }

        Ok(())
    }

    /// Write metrics in the order in which they were recorded
    pub fn write_metrics(&mut self, metrics: &Metrics) -> Result<()> {
        for (metric, value) in metrics.iter() {
            let row = MetricRow {
                metric: metric.to_string(),
                value,
            };
            self.metrics_writer.serialize(row)?;
        }

        Ok(())
    }

    /// Flush the underlying streams
    pub fn flush(&mut self) -> Result<()> {
        self.flows_writer.flush()?;
        self.metrics_writer.flush()?;

        Ok(())
    }
}

/// Write the flow table, metrics and run metadata to the output folder
pub fn write_evaluation(
    output_path: &Path,
    case_path: &Path,
    evaluation: &Evaluation,
) -> Result<()> {
    write_metadata(output_path, case_path).context("Failed to save metadata")?;

    let mut writer = DataWriter::create(output_path)?;
    writer.write_flows(&evaluation.flows)?;
    writer.write_metrics(&evaluation.metrics)?;
    writer.flush()?;

    Ok(())
}
