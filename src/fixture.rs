//! Fixtures for tests
use crate::case::{CapacityPolicy, CaseConfig, ExperimentParameters};
use crate::results::{ResultKey, Results};
use crate::time_series::{TimeIndex, TimeSeries};
use crate::units::Dimensionless;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Daily timesteps starting on 1 January 2018
pub fn daily_index(num_days: usize) -> TimeIndex {
    let start: NaiveDateTime = NaiveDate::from_ymd_opt(2018, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..num_days)
        .map(|day| start + TimeDelta::days(i64::try_from(day).unwrap()))
        .collect()
}

/// A series with one value per day, starting on 1 January 2018
pub fn series(values: &[f64]) -> TimeSeries {
    TimeSeries::new(daily_index(values.len()), values.to_vec()).unwrap()
}

/// Add the flow from `source` to `target` to `results`
pub fn insert_flow(results: &mut Results, source: &str, target: &str, values: &[f64]) {
    results
        .insert_sequence(ResultKey::flow(source, target), series(values))
        .unwrap();
}

#[fixture]
pub fn time_index() -> TimeIndex {
    daily_index(2)
}

/// A case with nothing but demand, evaluated over two days
#[fixture]
pub fn case_config() -> CaseConfig {
    CaseConfig {
        evaluated_days: 2,
        allow_shortage: false,
        number_of_equal_generators: 1,
        pv_fixed_capacity: CapacityPolicy::Absent,
        wind_fixed_capacity: CapacityPolicy::Absent,
        genset_fixed_capacity: CapacityPolicy::Absent,
        storage_fixed_capacity: CapacityPolicy::Absent,
        pcc_consumption_fixed_capacity: CapacityPolicy::Absent,
        pcc_feedin_fixed_capacity: CapacityPolicy::Absent,
    }
}

#[fixture]
pub fn experiment() -> ExperimentParameters {
    ExperimentParameters {
        storage_crate_charge: None,
        maingrid_renewable_share: Dimensionless(0.0),
        pv_generation_max: None,
        wind_generation_max: None,
    }
}

/// Results for a demand of 10 kW on each of two days, with no excess generation
#[fixture]
pub fn results() -> Results {
    let mut results = Results::default();
    insert_flow(&mut results, "bus_electricity_mg", "sink_demand", &[10.0, 10.0]);
    insert_flow(&mut results, "bus_electricity_mg", "sink_excess", &[0.0, 0.0]);
    results
}
