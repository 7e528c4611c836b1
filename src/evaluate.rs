//! Functionality for evaluating the results of a solved case.
//!
//! Each component of the microgrid has its own extraction step, which reads the relevant results,
//! adds columns to the flow table and records metrics. The steps must be run in a fixed order
//! because later steps use metrics recorded by earlier ones.
use crate::case::CaseConfig;
use crate::flows::FlowTable;
use crate::metrics::{Metric, Metrics};
use crate::scenario::Scenario;
use crate::time_series::TimeSeries;
use anyhow::Result;
use log::info;

pub mod demand;
use demand::{get_demand, get_excess, get_shortage};
pub mod generation;
use generation::{get_fuel, get_genset, get_pv, get_wind};
pub mod grid;
use grid::get_national_grid;
pub mod renewables;
use renewables::get_res_share;
pub mod storage;
use storage::get_storage;

/// Number of days in a year, used to extrapolate results to annual values
const DAYS_PER_YEAR: f64 = 365.0;

/// The main electricity bus of the microgrid
pub const BUS_ELECTRICITY_MG: &str = "bus_electricity_mg";

/// The flow table and metrics calculated for a case
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Energy flows at each timestep
    pub flows: FlowTable,
    /// Summary metrics
    pub metrics: Metrics,
}

/// Evaluate the results of a solved case.
///
/// # Arguments
///
/// * `scenario` - The case configuration and the results of the optimisation
///
/// # Returns
///
/// The flow table and metrics or an error if a required result is missing.
pub fn evaluate(scenario: &Scenario) -> Result<Evaluation> {
    let case = &scenario.case;
    let experiment = &scenario.experiment;
    let results = &scenario.results;
    let electricity_bus = results.node(BUS_ELECTRICITY_MG)?;

    let mut metrics = Metrics::default();
    let mut flows = get_demand(case, &mut metrics, &electricity_bus)?;
    get_shortage(case, &mut metrics, &electricity_bus, &mut flows)?;
    get_excess(case, &mut metrics, &electricity_bus, &mut flows)?;
    get_pv(
        case,
        &mut metrics,
        &electricity_bus,
        &mut flows,
        experiment.pv_generation_max,
    )?;
    get_wind(
        case,
        &mut metrics,
        &electricity_bus,
        &mut flows,
        experiment.wind_generation_max,
    )?;
    get_genset(case, &mut metrics, &electricity_bus, &mut flows)?;
    get_fuel(case, &mut metrics, results)?;
    get_storage(case, &mut metrics, experiment, results, &mut flows)?;
    get_national_grid(
        case,
        &mut metrics,
        results,
        &mut flows,
        scenario.grid_availability.as_ref(),
    )?;
    get_res_share(&mut metrics, experiment)?;

    info!(
        "Evaluated {} flows and {} metrics over {} timesteps",
        flows.column_names().count(),
        metrics.len(),
        flows.num_rows()
    );

    Ok(Evaluation { flows, metrics })
}

/// Extrapolate the sum of a series over the evaluated period to a full year
pub fn annual_value(series: &TimeSeries, evaluated_days: u32) -> f64 {
    series.sum() * DAYS_PER_YEAR / f64::from(evaluated_days)
}

/// Record the annual value of `series` as `metric`, replacing any existing value
pub fn record_annual_value(
    metric: Metric,
    series: &TimeSeries,
    case: &CaseConfig,
    metrics: &mut Metrics,
) {
    metrics.insert(metric, annual_value(series, case.evaluated_days));
}
