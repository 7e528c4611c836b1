//! The flow table: a wide table with one column per named energy flow.
use crate::time_series::{TimeIndex, TimeSeries};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use log::warn;
use std::collections::HashMap;
use std::rc::Rc;

/// Energy flows for every timestep of a simulation, one column per flow.
///
/// Columns are kept in the order in which they were added.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowTable {
    index: TimeIndex,
    columns: IndexMap<String, Vec<f64>>,
}

impl FlowTable {
    /// Create a new table whose rows are the timesteps of `series` and with a single column
    pub fn from_series(name: &str, series: &TimeSeries) -> Self {
        let mut columns = IndexMap::new();
        columns.insert(name.to_string(), series.values().to_vec());

        Self {
            index: Rc::clone(series.index()),
            columns,
        }
    }

    /// Add a column holding the values of `series`, aligned by timestep.
    ///
    /// Rows for which `series` has no value are filled with NaN. Values at timesteps outside of
    /// the table's index are discarded. If a column called `name` already exists, it is replaced.
    pub fn join(&mut self, name: &str, series: &TimeSeries) {
        let values = if Rc::ptr_eq(&self.index, series.index()) || self.index == *series.index() {
            series.values().to_vec()
        } else {
            self.align(name, series)
        };

        if self.columns.insert(name.to_string(), values).is_some() {
            warn!("Flow table already has a column called '{name}'; it has been replaced");
        }
    }

    /// Reindex `series` onto the table's timesteps
    fn align(&self, name: &str, series: &TimeSeries) -> Vec<f64> {
        let by_timestep: HashMap<&NaiveDateTime, f64> = series.iter().collect();
        let values: Vec<f64> = self
            .index
            .iter()
            .map(|timestep| by_timestep.get(timestep).copied().unwrap_or(f64::NAN))
            .collect();

        let num_matched = self
            .index
            .iter()
            .filter(|timestep| by_timestep.contains_key(timestep))
            .count();
        if num_matched < series.len() {
            warn!(
                "{} timesteps of '{name}' are not in the flow table and have been dropped",
                series.len() - num_matched
            );
        }

        values
    }

    /// The timesteps of the table
    pub fn index(&self) -> &TimeIndex {
        &self.index
    }

    /// The number of rows
    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    /// The names of the columns, in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Get a column as a [`TimeSeries`]
    pub fn column(&self, name: &str) -> Option<TimeSeries> {
        let values = self.columns.get(name)?;
        TimeSeries::new(Rc::clone(&self.index), values.clone()).ok()
    }

    /// Iterate over the rows of the table, as a timestep and the values for each column
    pub fn iter_rows(&self) -> impl Iterator<Item = (&NaiveDateTime, Vec<f64>)> {
        self.index.iter().enumerate().map(|(row, timestep)| {
            let values = self.columns.values().map(|column| column[row]).collect();
            (timestep, values)
        })
    }
}
