//! The scenario represents all the input data needed to evaluate a solved case.
use crate::case::{CaseConfig, ExperimentParameters};
use crate::results::Results;
use crate::time_series::TimeSeries;
use std::path::PathBuf;

/// A solved case, ready to be evaluated
pub struct Scenario {
    /// Path to the case folder
    pub case_path: PathBuf,
    /// Which components are present and how their capacities were determined
    pub case: CaseConfig,
    /// Parameters of the experiment which produced the results
    pub experiment: ExperimentParameters,
    /// Results of the optimisation
    pub results: Results,
    /// Availability of the national grid at each timestep, if known
    pub grid_availability: Option<TimeSeries>,
}
