//! The configuration of a case: which components are present in the microgrid and how their
//! capacities were determined.
use crate::input::deserialise_proportion;
use crate::units::Dimensionless;
use anyhow::{Result, ensure};
use log::warn;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

/// How the capacity of a component was determined
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CapacityPolicy {
    /// The component is not part of the microgrid
    #[default]
    Absent,
    /// The capacity was given in advance
    Fixed(f64),
    /// The capacity was chosen by the optimiser
    Optimised,
}

impl CapacityPolicy {
    /// Whether the component is part of the microgrid
    pub fn is_present(&self) -> bool {
        *self != Self::Absent
    }
}

impl<'de> Deserialize<'de> for CapacityPolicy {
    fn deserialize<D>(deserialiser: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Value(f64),
            Label(String),
        }

        match Raw::deserialize(deserialiser)? {
            Raw::Value(value) => Ok(Self::Fixed(value)),
            Raw::Label(label) => match label.to_lowercase().as_str() {
                "absent" => Ok(Self::Absent),
                "optimise" | "optimize" => Ok(Self::Optimised),
                _ => Err(D::Error::custom(format!(
                    "Invalid capacity '{label}': should be a number, \"optimise\" or \"absent\""
                ))),
            },
        }
    }
}

fn default_number_of_equal_generators() -> u32 {
    1
}

/// The components of the microgrid and other settings for the evaluation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CaseConfig {
    /// The number of days covered by the results
    pub evaluated_days: u32,
    /// Whether demand may go unmet
    #[serde(default)]
    pub allow_shortage: bool,
    /// The number of identical generator units
    #[serde(default = "default_number_of_equal_generators")]
    pub number_of_equal_generators: u32,
    /// PV array capacity (kWp)
    #[serde(default)]
    pub pv_fixed_capacity: CapacityPolicy,
    /// Wind turbine capacity (kW)
    #[serde(default)]
    pub wind_fixed_capacity: CapacityPolicy,
    /// Capacity of all generator units combined (kW)
    #[serde(default)]
    pub genset_fixed_capacity: CapacityPolicy,
    /// Battery storage capacity (kWh)
    #[serde(default)]
    pub storage_fixed_capacity: CapacityPolicy,
    /// Capacity of the connection for importing from the national grid (kW)
    #[serde(default)]
    pub pcc_consumption_fixed_capacity: CapacityPolicy,
    /// Capacity of the connection for exporting to the national grid (kW)
    #[serde(default)]
    pub pcc_feedin_fixed_capacity: CapacityPolicy,
}

impl CaseConfig {
    /// Whether the microgrid is connected to the national grid in either direction
    pub fn has_grid_connection(&self) -> bool {
        self.pcc_consumption_fixed_capacity.is_present()
            || self.pcc_feedin_fixed_capacity.is_present()
    }

    /// Check the configuration is consistent
    pub fn validate(&self) -> Result<()> {
        ensure!(self.evaluated_days > 0, "evaluated_days must be greater than zero");

        if self.genset_fixed_capacity.is_present() {
            ensure!(
                self.number_of_equal_generators > 0,
                "number_of_equal_generators must be at least one if there is a genset"
            );
        }

        let fixed_capacities = [
            ("pv", self.pv_fixed_capacity),
            ("wind", self.wind_fixed_capacity),
            ("genset", self.genset_fixed_capacity),
            ("storage", self.storage_fixed_capacity),
            ("pcc_consumption", self.pcc_consumption_fixed_capacity),
            ("pcc_feedin", self.pcc_feedin_fixed_capacity),
        ];
        for (name, policy) in fixed_capacities {
            if let CapacityPolicy::Fixed(value) = policy {
                ensure!(value.is_finite(), "{name}_fixed_capacity must be finite");
                if value < 0.0 {
                    warn!("{name}_fixed_capacity is negative ({value})");
                }
            }
        }

        Ok(())
    }
}

/// Parameters of the experiment which produced the results
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExperimentParameters {
    /// Maximum charge rate of the battery as a fraction of its capacity per timestep
    #[serde(alias = "storage_Crate_charge")]
    pub storage_crate_charge: Option<Dimensionless>,
    /// The share of national grid electricity that comes from renewable sources
    #[serde(deserialize_with = "deserialise_proportion")]
    pub maingrid_renewable_share: Dimensionless,
    /// Peak PV generation per unit of optimised capacity
    pub pv_generation_max: Option<Dimensionless>,
    /// Peak wind generation per unit of optimised capacity
    pub wind_generation_max: Option<Dimensionless>,
}

impl ExperimentParameters {
    /// Check the parameters are consistent with the case configuration
    pub fn validate(&self, case: &CaseConfig) -> Result<()> {
        if case.storage_fixed_capacity == CapacityPolicy::Optimised {
            ensure!(
                self.storage_crate_charge.is_some(),
                "storage_crate_charge must be provided if storage capacity is optimised"
            );
        }

        if let Some(Dimensionless(crate_charge)) = self.storage_crate_charge {
            ensure!(
                crate_charge.is_finite() && crate_charge > 0.0,
                "storage_crate_charge must be a finite number greater than zero"
            );
        }

        if case.pv_fixed_capacity == CapacityPolicy::Optimised {
            ensure!(
                self.pv_generation_max.is_some(),
                "pv_generation_max must be provided if PV capacity is optimised"
            );
        }

        if case.wind_fixed_capacity == CapacityPolicy::Optimised {
            ensure!(
                self.wind_generation_max.is_some(),
                "wind_generation_max must be provided if wind capacity is optimised"
            );
        }

        Ok(())
    }
}
