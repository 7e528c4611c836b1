//! Extraction of electricity generation by PV, wind and generators, and the fuel they use.
use super::{BUS_ELECTRICITY_MG, record_annual_value};
use crate::case::{CapacityPolicy, CaseConfig};
use crate::flows::FlowTable;
use crate::metrics::{Metric, Metrics};
use crate::results::{NodeView, ResultKey, Results};
use crate::units::{Dimensionless, Power};
use anyhow::{Context, Result};
use log::{debug, warn};

/// Describes where to find the results for a variable renewable source and what to call them
struct RenewableSource {
    name: &'static str,
    node: &'static str,
    column: &'static str,
    generation_metric: Metric,
    capacity_metric: Metric,
}

const PV: RenewableSource = RenewableSource {
    name: "PV",
    node: "source_pv",
    column: "PV generation",
    generation_metric: Metric::TotalPvGeneration,
    capacity_metric: Metric::CapacityPv,
};

const WIND: RenewableSource = RenewableSource {
    name: "Wind",
    node: "source_wind",
    column: "Wind generation",
    generation_metric: Metric::TotalWindGeneration,
    capacity_metric: Metric::CapacityWind,
};

const GENSET_TOTAL_COLUMN: &str = "Genset generation";

/// The name of the node for the generator unit with the given number (starting at one)
fn genset_node(number: u32) -> String {
    format!("transformer_genset_{number}")
}

/// Read PV generation and capacity
pub fn get_pv(
    case: &CaseConfig,
    metrics: &mut Metrics,
    electricity_bus: &NodeView,
    flows: &mut FlowTable,
    generation_max: Option<Dimensionless>,
) -> Result<()> {
    debug!("Evaluate flow: pv");
    get_renewable_source(
        &PV,
        case.pv_fixed_capacity,
        case,
        metrics,
        electricity_bus,
        flows,
        generation_max,
    )
}

/// Read wind generation and capacity
pub fn get_wind(
    case: &CaseConfig,
    metrics: &mut Metrics,
    electricity_bus: &NodeView,
    flows: &mut FlowTable,
    generation_max: Option<Dimensionless>,
) -> Result<()> {
    debug!("Evaluate flow: wind");
    get_renewable_source(
        &WIND,
        case.wind_fixed_capacity,
        case,
        metrics,
        electricity_bus,
        flows,
        generation_max,
    )
}

fn get_renewable_source(
    source: &RenewableSource,
    policy: CapacityPolicy,
    case: &CaseConfig,
    metrics: &mut Metrics,
    electricity_bus: &NodeView,
    flows: &mut FlowTable,
    generation_max: Option<Dimensionless>,
) -> Result<()> {
    if policy.is_present() {
        let generation =
            electricity_bus.sequence(&ResultKey::flow(source.node, BUS_ELECTRICITY_MG))?;
        record_annual_value(source.generation_metric, generation, case, metrics);
        flows.join(source.column, generation);
    } else {
        metrics.insert(source.generation_metric, 0.0);
    }

    let capacity = match policy {
        CapacityPolicy::Absent => Some(Power(0.0)),
        CapacityPolicy::Fixed(value) => Some(Power(value)),
        CapacityPolicy::Optimised => {
            let invest =
                electricity_bus.scalar(&ResultKey::invest(source.node, BUS_ELECTRICITY_MG))?;
            let generation_max = generation_max.with_context(|| {
                format!("No generation_max given for optimised {} capacity", source.name)
            })?;
            let capacity = capacity_from_invest(Power(invest), generation_max);
            if capacity.is_none() {
                warn!(
                    "Invalid {} generation_max ({generation_max}): capacity cannot be calculated",
                    source.name
                );
            }
            capacity
        }
    };

    if let Some(capacity) = capacity {
        metrics.insert(source.capacity_metric, capacity);
    }

    Ok(())
}

/// Convert the optimised size of a renewable source into its installed capacity.
///
/// `generation_max` is the peak generation per unit of optimised size. It may be expressed either
/// as a fraction (divide) or as a multiple (multiply). Returns `None` if `generation_max` is not
/// positive or is exactly one.
pub fn capacity_from_invest(invest: Power, generation_max: Dimensionless) -> Option<Power> {
    if generation_max > Dimensionless(1.0) {
        Some(invest * generation_max)
    } else if generation_max > Dimensionless(0.0) && generation_max < Dimensionless(1.0) {
        Some(invest / generation_max)
    } else {
        None
    }
}

/// Read generation and capacity of the generator units.
///
/// The generators are identical, so generation is reported for each unit and in total, while
/// capacity is the total for all units.
pub fn get_genset(
    case: &CaseConfig,
    metrics: &mut Metrics,
    electricity_bus: &NodeView,
    flows: &mut FlowTable,
) -> Result<()> {
    debug!("Evaluate flow: genset");
    let num_units = case.number_of_equal_generators;

    if case.genset_fixed_capacity.is_present() {
        let mut total = None;
        for number in 1..=num_units {
            let key = ResultKey::flow(&genset_node(number), BUS_ELECTRICITY_MG);
            let generation = electricity_bus.sequence(&key)?;
            flows.join(&format!("Genset {number} generation"), generation);
            total = Some(match total {
                None => generation.clone(),
                Some(total) => generation.add(&total)?,
            });
        }

        let total = total.context("There must be at least one generator")?;
        record_annual_value(Metric::TotalGensetGeneration, &total, case, metrics);
        flows.join(GENSET_TOTAL_COLUMN, &total);
    } else {
        metrics.insert(Metric::TotalGensetGeneration, 0.0);
    }

    let capacity = match case.genset_fixed_capacity {
        CapacityPolicy::Absent => Power(0.0),
        CapacityPolicy::Fixed(value) => Power(value),
        CapacityPolicy::Optimised => {
            let mut capacity = Power(0.0);
            for number in 1..=num_units {
                let key = ResultKey::invest(&genset_node(number), BUS_ELECTRICITY_MG);
                capacity = capacity + Power(electricity_bus.scalar(&key)?);
            }
            capacity
        }
    };
    metrics.insert(Metric::CapacityGenset, capacity);

    Ok(())
}

/// Read the fuel consumed by the generators (litres)
pub fn get_fuel(case: &CaseConfig, metrics: &mut Metrics, results: &Results) -> Result<()> {
    debug!("Evaluate flow: fuel");
    if case.genset_fixed_capacity.is_present() {
        let fuel_bus = results.node("bus_fuel")?;
        let fuel = fuel_bus.sequence(&ResultKey::flow("source_fuel", "bus_fuel"))?;
        record_annual_value(Metric::ConsumptionFuelAnnual, fuel, case, metrics);
    } else {
        metrics.insert(Metric::ConsumptionFuelAnnual, 0.0);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{case_config, insert_flow, results, series};
    use float_cmp::approx_eq;
    use itertools::assert_equal;
    use rstest::rstest;

    fn demand_table() -> FlowTable {
        FlowTable::from_series("Demand", &series(&[10.0, 10.0]))
    }

    #[rstest]
    #[case(2.0, Some(10.0))]
    #[case(0.5, Some(10.0))]
    #[case(0.25, Some(20.0))]
    #[case(1.0, None)]
    #[case(0.0, None)]
    #[case(-0.5, None)]
    #[case(f64::NAN, None)]
    fn test_capacity_from_invest(#[case] generation_max: f64, #[case] expected: Option<f64>) {
        assert_eq!(
            capacity_from_invest(Power(5.0), Dimensionless(generation_max)),
            expected.map(Power)
        );
    }

    #[rstest]
    fn test_get_pv_absent(case_config: CaseConfig, results: Results) {
        let mut metrics = Metrics::default();
        let mut flows = demand_table();
        let bus = results.node(BUS_ELECTRICITY_MG).unwrap();
        get_pv(&case_config, &mut metrics, &bus, &mut flows, None).unwrap();

        assert_eq!(metrics.get(Metric::TotalPvGeneration).unwrap(), 0.0);
        assert_eq!(metrics.get(Metric::CapacityPv).unwrap(), 0.0);
        assert_equal(flows.column_names(), ["Demand"]);
    }

    #[rstest]
    #[case(0.5, 8.0)]
    #[case(0.25, 16.0)]
    #[case(2.0, 8.0)]
    #[case(3.0, 12.0)]
    fn test_get_pv_optimised(
        mut case_config: CaseConfig,
        mut results: Results,
        #[case] generation_max: f64,
        #[case] expected_capacity: f64,
    ) {
        case_config.pv_fixed_capacity = CapacityPolicy::Optimised;
        insert_flow(&mut results, "source_pv", BUS_ELECTRICITY_MG, &[3.0, 1.0]);
        results
            .insert_scalar(ResultKey::invest("source_pv", BUS_ELECTRICITY_MG), 4.0)
            .unwrap();

        let mut metrics = Metrics::default();
        let mut flows = demand_table();
        let bus = results.node(BUS_ELECTRICITY_MG).unwrap();
        get_pv(
            &case_config,
            &mut metrics,
            &bus,
            &mut flows,
            Some(Dimensionless(generation_max)),
        )
        .unwrap();

        assert_eq!(metrics.get(Metric::CapacityPv).unwrap(), expected_capacity);
        assert!(approx_eq!(
            f64,
            metrics.get(Metric::TotalPvGeneration).unwrap(),
            4.0 * 365.0 / 2.0
        ));
        assert_equal(flows.column_names(), ["Demand", "PV generation"]);
    }

    #[rstest]
    fn test_get_wind_invalid_generation_max(mut case_config: CaseConfig, mut results: Results) {
        case_config.wind_fixed_capacity = CapacityPolicy::Optimised;
        insert_flow(&mut results, "source_wind", BUS_ELECTRICITY_MG, &[3.0, 1.0]);
        results
            .insert_scalar(ResultKey::invest("source_wind", BUS_ELECTRICITY_MG), 4.0)
            .unwrap();

        let mut metrics = Metrics::default();
        let mut flows = demand_table();
        let bus = results.node(BUS_ELECTRICITY_MG).unwrap();
        get_wind(
            &case_config,
            &mut metrics,
            &bus,
            &mut flows,
            Some(Dimensionless(1.0)),
        )
        .unwrap();

        // Generation is still recorded, but capacity is left unset
        assert!(metrics.contains(Metric::TotalWindGeneration));
        assert!(!metrics.contains(Metric::CapacityWind));
        assert_equal(flows.column_names(), ["Demand", "Wind generation"]);
    }

    #[rstest]
    fn test_get_wind_fixed(mut case_config: CaseConfig, mut results: Results) {
        case_config.wind_fixed_capacity = CapacityPolicy::Fixed(12.5);
        insert_flow(&mut results, "source_wind", BUS_ELECTRICITY_MG, &[3.0, 1.0]);

        let mut metrics = Metrics::default();
        let mut flows = demand_table();
        let bus = results.node(BUS_ELECTRICITY_MG).unwrap();
        get_wind(&case_config, &mut metrics, &bus, &mut flows, None).unwrap();

        assert_eq!(metrics.get(Metric::CapacityWind).unwrap(), 12.5);
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    fn test_get_genset_units_sum_to_total(
        mut case_config: CaseConfig,
        mut results: Results,
        #[case] num_units: u32,
    ) {
        case_config.genset_fixed_capacity = CapacityPolicy::Optimised;
        case_config.number_of_equal_generators = num_units;
        for number in 1..=num_units {
            let number_f = f64::from(number);
            insert_flow(
                &mut results,
                &genset_node(number),
                BUS_ELECTRICITY_MG,
                &[number_f, 2.0 * number_f],
            );
            results
                .insert_scalar(
                    ResultKey::invest(&genset_node(number), BUS_ELECTRICITY_MG),
                    10.0,
                )
                .unwrap();
        }

        let mut metrics = Metrics::default();
        let mut flows = demand_table();
        let bus = results.node(BUS_ELECTRICITY_MG).unwrap();
        get_genset(&case_config, &mut metrics, &bus, &mut flows).unwrap();

        // Per-unit columns followed by the total
        let mut expected_columns = vec!["Demand".to_string()];
        expected_columns.extend((1..=num_units).map(|n| format!("Genset {n} generation")));
        expected_columns.push(GENSET_TOTAL_COLUMN.to_string());
        assert_equal(flows.column_names(), expected_columns.iter().map(String::as_str));

        let total = flows.column(GENSET_TOTAL_COLUMN).unwrap();
        for (row, value) in total.values().iter().enumerate() {
            let unit_sum: f64 = (1..=num_units)
                .map(|n| flows.column(&format!("Genset {n} generation")).unwrap().values()[row])
                .sum();
            assert_eq!(*value, unit_sum);
        }

        assert_eq!(
            metrics.get(Metric::CapacityGenset).unwrap(),
            10.0 * f64::from(num_units)
        );
        assert!(approx_eq!(
            f64,
            metrics.get(Metric::TotalGensetGeneration).unwrap(),
            total.sum() * 365.0 / 2.0
        ));
    }

    #[rstest]
    fn test_get_genset_absent(case_config: CaseConfig, results: Results) {
        let mut metrics = Metrics::default();
        let mut flows = demand_table();
        let bus = results.node(BUS_ELECTRICITY_MG).unwrap();
        get_genset(&case_config, &mut metrics, &bus, &mut flows).unwrap();

        assert_eq!(metrics.get(Metric::TotalGensetGeneration).unwrap(), 0.0);
        assert_eq!(metrics.get(Metric::CapacityGenset).unwrap(), 0.0);
        assert_equal(flows.column_names(), ["Demand"]);
    }

    #[rstest]
    fn test_get_fuel(mut case_config: CaseConfig, mut results: Results) {
        let mut metrics = Metrics::default();
        get_fuel(&case_config, &mut metrics, &results).unwrap();
        assert_eq!(metrics.get(Metric::ConsumptionFuelAnnual).unwrap(), 0.0);

        case_config.genset_fixed_capacity = CapacityPolicy::Fixed(5.0);
        insert_flow(&mut results, "source_fuel", "bus_fuel", &[1.0, 3.0]);
        get_fuel(&case_config, &mut metrics, &results).unwrap();
        assert_eq!(metrics.get(Metric::ConsumptionFuelAnnual).unwrap(), 730.0);
    }
}
