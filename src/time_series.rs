//! Time-indexed series of values, as produced by the solver for each flow.
use anyhow::{Result, ensure};
use chrono::NaiveDateTime;
use std::rc::Rc;

/// The timesteps of a simulation, in ascending order
pub type TimeIndex = Rc<[NaiveDateTime]>;

/// A series of values with one value per timestep
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    index: TimeIndex,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a new [`TimeSeries`], checking that there is one value per timestep
    pub fn new(index: TimeIndex, values: Vec<f64>) -> Result<Self> {
        ensure!(
            index.len() == values.len(),
            "Time series has {} timesteps but {} values",
            index.len(),
            values.len()
        );

        Ok(Self { index, values })
    }

    /// A series with the same value at every timestep
    pub fn constant(index: TimeIndex, value: f64) -> Self {
        let values = vec![value; index.len()];
        Self { index, values }
    }

    /// The timesteps of this series
    pub fn index(&self) -> &TimeIndex {
        &self.index
    }

    /// The values of this series
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over pairs of timestep and value
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDateTime, f64)> {
        self.index.iter().zip(self.values.iter().copied())
    }

    /// The number of timesteps
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no timesteps
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The sum over all timesteps
    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    /// The largest value, or `None` if the series is empty
    pub fn max(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::max)
    }

    /// A new series with every value multiplied by `factor`
    pub fn scale(&self, factor: f64) -> Self {
        self.map(|value| value * factor)
    }

    /// A new series with `f` applied to every value
    pub fn map<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            index: Rc::clone(&self.index),
            values: self.values.iter().copied().map(f).collect(),
        }
    }

    /// Element-wise sum of two series sharing the same timesteps
    pub fn add(&self, other: &TimeSeries) -> Result<Self> {
        self.zip_with(other, |a, b| a + b)
    }

    /// Element-wise difference of two series sharing the same timesteps
    pub fn sub(&self, other: &TimeSeries) -> Result<Self> {
        self.zip_with(other, |a, b| a - b)
    }

    fn zip_with<F: Fn(f64, f64) -> f64>(&self, other: &TimeSeries, f: F) -> Result<Self> {
        ensure!(
            self.has_same_index(other),
            "Cannot combine time series with different timesteps"
        );

        Ok(Self {
            index: Rc::clone(&self.index),
            values: self
                .values
                .iter()
                .zip(&other.values)
                .map(|(a, b)| f(*a, *b))
                .collect(),
        })
    }

    /// Whether `other` has exactly the same timesteps as this series
    pub fn has_same_index(&self, other: &TimeSeries) -> bool {
        Rc::ptr_eq(&self.index, &other.index) || self.index == other.index
    }
}
