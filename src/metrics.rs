//! Scalar summary metrics calculated from the results of a model.
use anyhow::{Context, Result};
use indexmap::IndexMap;
use strum::{Display, EnumIter, EnumString};

/// A scalar metric describing the operation or design of the microgrid.
///
/// Annual values are extrapolated from the evaluated period to a full year. Energy is in kWh, power
/// in kW and fuel in litres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[allow(missing_docs)]
pub enum Metric {
    #[strum(to_string = "total_demand_annual_kWh")]
    TotalDemandAnnual,
    #[strum(to_string = "demand_peak_kW")]
    DemandPeak,
    #[strum(to_string = "total_demand_supplied_annual_kWh")]
    TotalDemandSuppliedAnnual,
    #[strum(to_string = "total_demand_shortage_annual_kWh")]
    TotalDemandShortageAnnual,
    #[strum(to_string = "total_demand_excess_annual_kWh")]
    TotalDemandExcessAnnual,
    #[strum(to_string = "total_pv_generation_kWh")]
    TotalPvGeneration,
    #[strum(to_string = "capacity_pv_kWp")]
    CapacityPv,
    #[strum(to_string = "total_wind_generation_kWh")]
    TotalWindGeneration,
    #[strum(to_string = "capacity_wind_kW")]
    CapacityWind,
    #[strum(to_string = "total_genset_generation_kWh")]
    TotalGensetGeneration,
    #[strum(to_string = "capacity_genset_kW")]
    CapacityGenset,
    #[strum(to_string = "consumption_fuel_annual_l")]
    ConsumptionFuelAnnual,
    #[strum(to_string = "total_battery_throughput_kWh")]
    TotalBatteryThroughput,
    #[strum(to_string = "capacity_storage_kWh")]
    CapacityStorage,
    #[strum(to_string = "consumption_main_grid_mg_side_annual_kWh")]
    ConsumptionMainGridMgSideAnnual,
    #[strum(to_string = "consumption_main_grid_utility_side_annual_kWh")]
    ConsumptionMainGridUtilitySideAnnual,
    #[strum(to_string = "autonomy_factor")]
    AutonomyFactor,
    #[strum(to_string = "feedin_main_grid_mg_side_annual_kWh")]
    FeedinMainGridMgSideAnnual,
    #[strum(to_string = "feedin_main_grid_utility_side_annual_kWh")]
    FeedinMainGridUtilitySideAnnual,
    #[strum(to_string = "capacity_pcoupling_kW")]
    CapacityPcoupling,
    #[strum(to_string = "total_pcoupling_throughput_kWh")]
    TotalPcouplingThroughput,
    #[strum(to_string = "res_share")]
    ResShare,
}

/// Metrics recorded so far, in the order in which they were first recorded
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Metrics(IndexMap<Metric, f64>);

impl Metrics {
    /// Record a metric, replacing any previous value
    pub fn insert<T: Into<f64>>(&mut self, metric: Metric, value: T) {
        self.0.insert(metric, value.into());
    }

    /// Get the value of a metric which has already been recorded
    pub fn get(&self, metric: Metric) -> Result<f64> {
        self.0
            .get(&metric)
            .copied()
            .with_context(|| format!("Metric {metric} has not been calculated"))
    }

    /// Whether the metric has been recorded
    pub fn contains(&self, metric: Metric) -> bool {
        self.0.contains_key(&metric)
    }

    /// Iterate over the recorded metrics
    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.0.iter().map(|(metric, value)| (*metric, *value))
    }

    /// The number of recorded metrics
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no metrics have been recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
