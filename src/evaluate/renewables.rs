//! Calculation of the share of electricity generated from renewable sources.
use crate::case::ExperimentParameters;
use crate::metrics::{Metric, Metrics};
use crate::units::{Dimensionless, Energy};
use anyhow::Result;
use log::{debug, warn};

/// Calculate the renewable share from total and fossil generation.
///
/// Returns `None` if there was no generation.
pub fn res_share(total_generation: Energy, fossil_generation: Energy) -> Option<Dimensionless> {
    if total_generation == Energy(0.0) {
        return None;
    }

    Some((Dimensionless(1.0) - fossil_generation / total_generation).abs())
}

/// Calculate the renewable share of the electricity consumed in the microgrid.
///
/// Only grid electricity which was actually consumed counts, weighted by the renewable share of
/// the national grid. Must be run after all other extraction steps.
pub fn get_res_share(metrics: &mut Metrics, experiment: &ExperimentParameters) -> Result<()> {
    debug!("Evaluate: res share");
    let genset = Energy(metrics.get(Metric::TotalGensetGeneration)?);
    let imported = Energy(metrics.get(Metric::ConsumptionMainGridMgSideAnnual)?);
    let pv = Energy(metrics.get(Metric::TotalPvGeneration)?);
    let wind = Energy(metrics.get(Metric::TotalWindGeneration)?);

    let total_generation = genset + imported + pv + wind;
    let grid_fossil_share = Dimensionless(1.0) - experiment.maingrid_renewable_share;
    let fossil_generation = genset + imported * grid_fossil_share;

    match res_share(total_generation, fossil_generation) {
        Some(share) => metrics.insert(Metric::ResShare, share),
        None => warn!("There was no generation: renewable share is undefined"),
    }

    Ok(())
}
