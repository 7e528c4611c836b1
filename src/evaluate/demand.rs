//! Extraction of electricity demand, unmet demand and excess generation.
use super::{BUS_ELECTRICITY_MG, record_annual_value};
use crate::case::CaseConfig;
use crate::flows::FlowTable;
use crate::metrics::{Metric, Metrics};
use crate::results::{NodeView, ResultKey};
use anyhow::{Context, Result};
use log::debug;

const DEMAND_COLUMN: &str = "Demand";
const SHORTAGE_COLUMN: &str = "Demand shortage";
const SUPPLIED_COLUMN: &str = "Demand supplied";
const EXCESS_COLUMN: &str = "Excess generation";

/// Read the demand, creating the flow table.
///
/// Records the annual demand and the peak demand.
pub fn get_demand(
    case: &CaseConfig,
    metrics: &mut Metrics,
    electricity_bus: &NodeView,
) -> Result<FlowTable> {
    debug!("Evaluate flow: demand");
    let demand = electricity_bus.sequence(&ResultKey::flow(BUS_ELECTRICITY_MG, "sink_demand"))?;
    let flows = FlowTable::from_series(DEMAND_COLUMN, demand);

    record_annual_value(Metric::TotalDemandAnnual, demand, case, metrics);
    let peak = demand.max().context("Demand has no timesteps")?;
    metrics.insert(Metric::DemandPeak, peak);

    Ok(flows)
}

/// Read unmet demand, if shortage is allowed, and calculate the demand which was supplied.
///
/// If shortage is not allowed, all demand is taken to have been supplied.
pub fn get_shortage(
    case: &CaseConfig,
    metrics: &mut Metrics,
    electricity_bus: &NodeView,
    flows: &mut FlowTable,
) -> Result<()> {
    debug!("Evaluate flow: shortage");
    if !case.allow_shortage {
        let total_demand = metrics.get(Metric::TotalDemandAnnual)?;
        metrics.insert(Metric::TotalDemandSuppliedAnnual, total_demand);
        metrics.insert(Metric::TotalDemandShortageAnnual, 0.0);
        return Ok(());
    }

    let shortage =
        electricity_bus.sequence(&ResultKey::flow("source_shortage", BUS_ELECTRICITY_MG))?;
    let demand = flows
        .column(DEMAND_COLUMN)
        .context("Demand must be evaluated before shortage")?;
    let supplied = demand.sub(shortage)?;

    record_annual_value(Metric::TotalDemandSuppliedAnnual, &supplied, case, metrics);
    record_annual_value(Metric::TotalDemandShortageAnnual, shortage, case, metrics);
    flows.join(SHORTAGE_COLUMN, shortage);
    flows.join(SUPPLIED_COLUMN, &supplied);

    Ok(())
}

/// Read excess generation which could not be used or stored
pub fn get_excess(
    case: &CaseConfig,
    metrics: &mut Metrics,
    electricity_bus: &NodeView,
    flows: &mut FlowTable,
) -> Result<()> {
    debug!("Evaluate flow: excess");
    let excess = electricity_bus.sequence(&ResultKey::flow(BUS_ELECTRICITY_MG, "sink_excess"))?;
    flows.join(EXCESS_COLUMN, excess);
    record_annual_value(Metric::TotalDemandExcessAnnual, excess, case, metrics);

    Ok(())
}
