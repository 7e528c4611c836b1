//! Extraction of battery storage flows, capacity and state of charge.
use super::{BUS_ELECTRICITY_MG, record_annual_value};
use crate::case::{CapacityPolicy, CaseConfig, ExperimentParameters};
use crate::flows::FlowTable;
use crate::metrics::{Metric, Metrics};
use crate::results::{ResultKey, Results};
use crate::units::Energy;
use anyhow::{Context, Result};
use log::debug;

const STORAGE: &str = "generic_storage";

/// Read storage charge, discharge and stored energy, and calculate the storage capacity.
///
/// If the capacity is positive, the state of charge is added to the flow table too.
pub fn get_storage(
    case: &CaseConfig,
    metrics: &mut Metrics,
    experiment: &ExperimentParameters,
    results: &Results,
    flows: &mut FlowTable,
) -> Result<()> {
    debug!("Evaluate flow: storage");
    let policy = case.storage_fixed_capacity;
    if !policy.is_present() {
        metrics.insert(Metric::TotalBatteryThroughput, 0.0);
        metrics.insert(Metric::CapacityStorage, 0.0);
        return Ok(());
    }

    let storage = results.node(STORAGE)?;
    let discharge = storage.sequence(&ResultKey::flow(STORAGE, BUS_ELECTRICITY_MG))?;
    let charge = storage.sequence(&ResultKey::flow(BUS_ELECTRICITY_MG, STORAGE))?;
    let stored = storage.sequence(&ResultKey::capacity(STORAGE))?;

    record_annual_value(Metric::TotalBatteryThroughput, charge, case, metrics);
    flows.join("Storage charge", charge);
    flows.join("Storage discharge", discharge);
    flows.join("Stored capacity", stored);

    let capacity = match policy {
        CapacityPolicy::Absent => Energy(0.0),
        CapacityPolicy::Fixed(value) => Energy(value),
        CapacityPolicy::Optimised => {
            // The optimiser sizes the charging edge, so convert power back to energy
            let electricity_bus = results.node(BUS_ELECTRICITY_MG)?;
            let invest = electricity_bus.scalar(&ResultKey::invest(BUS_ELECTRICITY_MG, STORAGE))?;
            let crate_charge = experiment
                .storage_crate_charge
                .context("storage_crate_charge is required for optimised storage")?;
            Energy(invest) / crate_charge
        }
    };
    metrics.insert(Metric::CapacityStorage, capacity);

    if capacity > Energy(0.0) {
        let soc = stored.map(|value| value / capacity.value());
        flows.join("Storage SOC", &soc);
    }

    Ok(())
}
