//! Code for reading the results of the optimisation from CSV files.
use crate::id::NodeID;
use crate::input::{input_err_msg, is_sorted_and_unique, read_csv, read_csv_optional};
use crate::results::{Field, ResultKey, Results};
use crate::time_series::{TimeIndex, TimeSeries};
use anyhow::{Context, Result, ensure};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;
use std::rc::Rc;

const SEQUENCES_FILE_NAME: &str = "sequences.csv";
const SCALARS_FILE_NAME: &str = "scalars.csv";
const GRID_AVAILABILITY_FILE_NAME: &str = "grid_availability.csv";

/// A single value of a time-varying result, as read from the sequences CSV file
#[derive(Debug, Deserialize, PartialEq)]
struct SequenceRaw {
    source: NodeID,
    target: Option<NodeID>,
    field: Field,
    timestep: NaiveDateTime,
    value: f64,
}

/// A single-valued result, as read from the scalars CSV file
#[derive(Debug, Deserialize, PartialEq)]
struct ScalarRaw {
    source: NodeID,
    target: Option<NodeID>,
    field: Field,
    value: f64,
}

/// The availability of the national grid at one timestep
#[derive(Debug, Deserialize, PartialEq)]
struct GridAvailabilityRaw {
    timestep: NaiveDateTime,
    value: f64,
}

/// Read the results of the optimisation from the specified case directory.
///
/// Sequences are required, but the scalars file may be omitted if no capacities were optimised.
pub fn read_results(case_dir: &Path) -> Result<Results> {
    let mut results = Results::default();

    let file_path = case_dir.join(SEQUENCES_FILE_NAME);
    let sequences = read_csv(&file_path)?;
    add_sequences(&mut results, sequences).with_context(|| input_err_msg(&file_path))?;

    let file_path = case_dir.join(SCALARS_FILE_NAME);
    let scalars = read_csv_optional(&file_path)?;
    add_scalars(&mut results, scalars).with_context(|| input_err_msg(&file_path))?;

    Ok(results)
}

/// Read the availability of the national grid, if provided
pub fn read_grid_availability(case_dir: &Path) -> Result<Option<TimeSeries>> {
    let file_path = case_dir.join(GRID_AVAILABILITY_FILE_NAME);
    if !file_path.is_file() {
        return Ok(None);
    }

    let (timesteps, values): (Vec<_>, Vec<_>) = read_csv::<GridAvailabilityRaw>(&file_path)?
        .map(|row| (row.timestep, row.value))
        .unzip();
    let series = make_series(timesteps, values, None).with_context(|| input_err_msg(&file_path))?;

    Ok(Some(series))
}

/// Group the rows of the sequences file into one time series per key
fn add_sequences<I>(results: &mut Results, iter: I) -> Result<()>
where
    I: Iterator<Item = SequenceRaw>,
{
    let mut grouped: IndexMap<ResultKey, (Vec<NaiveDateTime>, Vec<f64>)> = IndexMap::new();
    for row in iter {
        let key = ResultKey {
            source: row.source,
            target: row.target,
            field: row.field,
        };
        let (timesteps, values) = grouped.entry(key).or_default();
        timesteps.push(row.timestep);
        values.push(row.value);
    }

    // Sequences with the same timesteps share an index
    let mut shared_index: Option<TimeIndex> = None;
    for (key, (timesteps, values)) in grouped {
        let series = make_series(timesteps, values, shared_index.as_ref())
            .with_context(|| format!("Invalid sequence {key}"))?;
        shared_index = Some(Rc::clone(series.index()));
        results.insert_sequence(key, series)?;
    }

    Ok(())
}

fn add_scalars<I>(results: &mut Results, iter: I) -> Result<()>
where
    I: Iterator<Item = ScalarRaw>,
{
    for row in iter {
        let key = ResultKey {
            source: row.source,
            target: row.target,
            field: row.field,
        };
        results.insert_scalar(key, row.value)?;
    }

    Ok(())
}

/// Create a [`TimeSeries`], reusing `existing_index` if the timesteps are identical
fn make_series(
    timesteps: Vec<NaiveDateTime>,
    values: Vec<f64>,
    existing_index: Option<&TimeIndex>,
) -> Result<TimeSeries> {
    ensure!(
        is_sorted_and_unique(&timesteps),
        "Timesteps must be unique and in ascending order"
    );

    let index = match existing_index {
        Some(index) if **index == *timesteps => Rc::clone(index),
        _ => TimeIndex::from(timesteps),
    };

    TimeSeries::new(index, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, daily_index};
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, file_name: &str, contents: &str) {
        let mut file = File::create(dir.join(file_name)).unwrap();
        write!(file, "{contents}").unwrap();
    }

    fn sequence_row(source: &str, target: Option<&str>, day: usize, value: f64) -> SequenceRaw {
        SequenceRaw {
            source: source.into(),
            target: target.map(NodeID::from),
            field: Field::Flow,
            timestep: daily_index(day + 1)[day],
            value,
        }
    }

    #[test]
    fn test_add_sequences() {
        let rows = [
            sequence_row("source_pv", Some("bus"), 0, 1.0),
            sequence_row("bus", Some("sink_demand"), 0, 3.0),
            sequence_row("source_pv", Some("bus"), 1, 2.0),
            sequence_row("bus", Some("sink_demand"), 1, 4.0),
        ];
        let mut results = Results::default();
        add_sequences(&mut results, rows.into_iter()).unwrap();
        assert_eq!(results.num_sequences(), 2);

        let bus = results.node("bus").unwrap();
        let pv = bus
            .sequence(&ResultKey::flow("source_pv", "bus"))
            .unwrap();
        let demand = bus
            .sequence(&ResultKey::flow("bus", "sink_demand"))
            .unwrap();
        assert_eq!(pv.values(), [1.0, 2.0]);
        assert_eq!(demand.values(), [3.0, 4.0]);
        assert!(Rc::ptr_eq(pv.index(), demand.index()));
    }

    #[test]
    fn test_add_sequences_unordered() {
        let rows = [
            sequence_row("source_pv", Some("bus"), 1, 2.0),
            sequence_row("source_pv", Some("bus"), 0, 1.0),
        ];
        let mut results = Results::default();
        assert_error!(
            add_sequences(&mut results, rows.into_iter()),
            "Invalid sequence ((source_pv, bus), flow)"
        );
    }

    #[test]
    fn test_read_results() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            SEQUENCES_FILE_NAME,
            "source,target,field,timestep,value
generic_storage,,capacity,2018-01-01T00:00:00,1.5
generic_storage,,capacity,2018-01-02T00:00:00,2.5
",
        );
        write_file(
            dir.path(),
            SCALARS_FILE_NAME,
            "source,target,field,value
bus_electricity_mg,generic_storage,invest,4.0
",
        );

        let results = read_results(dir.path()).unwrap();
        let storage = results.node("generic_storage").unwrap();
        assert_eq!(
            storage
                .sequence(&ResultKey::capacity("generic_storage"))
                .unwrap()
                .values(),
            [1.5, 2.5]
        );
        assert_eq!(
            storage
                .scalar(&ResultKey::invest("bus_electricity_mg", "generic_storage"))
                .unwrap(),
            4.0
        );
    }

    #[test]
    fn test_read_results_duplicate_scalar() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            SEQUENCES_FILE_NAME,
            "source,target,field,timestep,value
source_pv,bus,flow,2018-01-01T00:00:00,1.0
",
        );
        write_file(
            dir.path(),
            SCALARS_FILE_NAME,
            "source,target,field,value
source_pv,bus,invest,4.0
source_pv,bus,invest,5.0
",
        );

        assert!(read_results(dir.path()).is_err());
    }

    #[test]
    fn test_read_grid_availability() {
        let dir = tempdir().unwrap();
        assert!(read_grid_availability(dir.path()).unwrap().is_none());

        write_file(
            dir.path(),
            GRID_AVAILABILITY_FILE_NAME,
            "timestep,value
2018-01-01T00:00:00,1
2018-01-02T00:00:00,0
",
        );
        let availability = read_grid_availability(dir.path()).unwrap().unwrap();
        assert_eq!(availability.values(), [1.0, 0.0]);
        assert_eq!(*availability.index(), daily_index(2));
    }
}
