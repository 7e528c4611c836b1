//! Extraction of flows to and from the national grid.
use super::{BUS_ELECTRICITY_MG, record_annual_value};
use crate::case::{CapacityPolicy, CaseConfig};
use crate::flows::FlowTable;
use crate::metrics::{Metric, Metrics};
use crate::results::{ResultKey, Results};
use crate::time_series::TimeSeries;
use crate::units::{Energy, Power};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::rc::Rc;

/// One direction of the point of common coupling with the national grid
struct GridLeg {
    name: &'static str,
    transformer: &'static str,
    utility_bus: &'static str,
    /// Whether electricity flows from the national grid into the microgrid
    is_import: bool,
    mg_column: &'static str,
    utility_column: &'static str,
    mg_metric: Metric,
    utility_metric: Metric,
}

const CONSUMPTION: GridLeg = GridLeg {
    name: "consumption",
    transformer: "transformer_pcc_consumption",
    utility_bus: "bus_electricity_ng_consumption",
    is_import: true,
    mg_column: "Consumption from main grid (MG side)",
    utility_column: "Consumption from main grid (utility side)",
    mg_metric: Metric::ConsumptionMainGridMgSideAnnual,
    utility_metric: Metric::ConsumptionMainGridUtilitySideAnnual,
};

const FEEDIN: GridLeg = GridLeg {
    name: "feedin",
    transformer: "transformer_pcc_feedin",
    utility_bus: "bus_electricity_ng_feedin",
    is_import: false,
    mg_column: "Feed into main grid (MG side)",
    utility_column: "Feed into main grid (utility side)",
    mg_metric: Metric::FeedinMainGridMgSideAnnual,
    utility_metric: Metric::FeedinMainGridUtilitySideAnnual,
};

impl GridLeg {
    /// The edge between the microgrid bus and the transformer
    fn mg_side_key(&self) -> ResultKey {
        if self.is_import {
            ResultKey::flow(self.transformer, BUS_ELECTRICITY_MG)
        } else {
            ResultKey::flow(BUS_ELECTRICITY_MG, self.transformer)
        }
    }

    /// The edge between the transformer and the national grid bus
    fn utility_side_key(&self) -> ResultKey {
        if self.is_import {
            ResultKey::flow(self.utility_bus, self.transformer)
        } else {
            ResultKey::flow(self.transformer, self.utility_bus)
        }
    }
}

/// Read the flows of one grid leg, returning the maximum utility-side flow if the leg is present
fn get_grid_leg(
    leg: &GridLeg,
    policy: CapacityPolicy,
    case: &CaseConfig,
    metrics: &mut Metrics,
    results: &Results,
    flows: &mut FlowTable,
) -> Result<Option<Power>> {
    if !policy.is_present() {
        metrics.insert(leg.mg_metric, 0.0);
        metrics.insert(leg.utility_metric, 0.0);
        return Ok(None);
    }

    let mg_side = results.node(BUS_ELECTRICITY_MG)?;
    let mg_flow = mg_side.sequence(&leg.mg_side_key())?;
    flows.join(leg.mg_column, mg_flow);
    record_annual_value(leg.mg_metric, mg_flow, case, metrics);

    let utility_side = results.node(leg.utility_bus)?;
    let utility_flow = utility_side.sequence(&leg.utility_side_key())?;
    flows.join(leg.utility_column, utility_flow);
    record_annual_value(leg.utility_metric, utility_flow, case, metrics);

    let peak = utility_flow
        .max()
        .with_context(|| format!("Grid {} has no timesteps", leg.name))?;
    Ok(Some(Power(peak)))
}

/// The capacity of a grid leg, or `None` if it is absent
fn leg_capacity(policy: CapacityPolicy, peak_flow: Option<Power>) -> Option<Power> {
    match policy {
        CapacityPolicy::Absent => None,
        CapacityPolicy::Fixed(value) => Some(Power(value)),
        CapacityPolicy::Optimised => peak_flow,
    }
}

/// Calculate the fraction of supplied demand which was not met by the national grid
pub fn autonomy_factor(supplied: Energy, imported: Energy) -> f64 {
    ((supplied - imported) / supplied).value()
}

/// Read consumption from and feed-in to the national grid and calculate the capacity of the
/// point of common coupling.
///
/// The grid availability is added to the flow table if the microgrid is connected to the
/// national grid; otherwise a column of zeros is added in its place.
pub fn get_national_grid(
    case: &CaseConfig,
    metrics: &mut Metrics,
    results: &Results,
    flows: &mut FlowTable,
    grid_availability: Option<&TimeSeries>,
) -> Result<()> {
    debug!("Evaluate flow: main grid");
    match grid_availability {
        Some(availability) if case.has_grid_connection() => {
            flows.join("Grid availability", availability);
        }
        _ => {
            if case.has_grid_connection() {
                warn!("No grid availability provided for a grid-connected case; assuming zero");
            }
            let zeros = TimeSeries::constant(Rc::clone(flows.index()), 0.0);
            flows.join("Grid availability", &zeros);
        }
    }

    let consumption_policy = case.pcc_consumption_fixed_capacity;
    let consumption_peak = get_grid_leg(
        &CONSUMPTION,
        consumption_policy,
        case,
        metrics,
        results,
        flows,
    )?;

    let supplied = Energy(metrics.get(Metric::TotalDemandSuppliedAnnual)?);
    let imported = Energy(metrics.get(CONSUMPTION.mg_metric)?);
    if supplied == Energy(0.0) {
        warn!("No demand was supplied: autonomy factor is undefined");
    }
    metrics.insert(Metric::AutonomyFactor, autonomy_factor(supplied, imported));

    let feedin_policy = case.pcc_feedin_fixed_capacity;
    let feedin_peak = get_grid_leg(&FEEDIN, feedin_policy, case, metrics, results, flows)?;

    let capacity = [
        leg_capacity(consumption_policy, consumption_peak),
        leg_capacity(feedin_policy, feedin_peak),
    ]
    .into_iter()
    .flatten()
    .reduce(|a, b| if b > a { b } else { a })
    .unwrap_or(Power(0.0));
    metrics.insert(Metric::CapacityPcoupling, capacity);

    let mut throughput = Energy(0.0);
    if consumption_policy.is_present() {
        throughput = throughput + Energy(metrics.get(CONSUMPTION.mg_metric)?);
    }
    if feedin_policy.is_present() {
        throughput = throughput + Energy(metrics.get(FEEDIN.mg_metric)?);
    }
    metrics.insert(Metric::TotalPcouplingThroughput, throughput);

    Ok(())
}
