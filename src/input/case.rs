//! Code for reading the case configuration file.
use crate::case::{CaseConfig, ExperimentParameters};
use crate::input::{input_err_msg, read_toml};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const CASE_FILE_NAME: &str = "case.toml";

/// Represents the contents of the entire case file.
#[derive(Debug, Deserialize, PartialEq)]
struct CaseFile {
    case: CaseConfig,
    experiment: ExperimentParameters,
}

/// Read the case configuration and experiment parameters from the specified directory.
///
/// # Arguments
///
/// * `case_dir` - Folder containing case configuration files
pub fn read_case_file(case_dir: &Path) -> Result<(CaseConfig, ExperimentParameters)> {
    let file_path = case_dir.join(CASE_FILE_NAME);
    let case_file: CaseFile = read_toml(&file_path)?;

    case_file
        .case
        .validate()
        .and_then(|()| case_file.experiment.validate(&case_file.case))
        .with_context(|| input_err_msg(&file_path))?;

    Ok((case_file.case, case_file.experiment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::CapacityPolicy;
    use crate::units::Dimensionless;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_case_file(dir: &Path, contents: &str) {
        let mut file = File::create(dir.join(CASE_FILE_NAME)).unwrap();
        write!(file, "{contents}").unwrap();
    }

    #[test]
    fn test_read_case_file() {
        let dir = tempdir().unwrap();
        write_case_file(
            dir.path(),
            "[case]
evaluated_days = 365
allow_shortage = true
pv_fixed_capacity = \"optimise\"
genset_fixed_capacity = 20.0
number_of_equal_generators = 2

[experiment]
storage_Crate_charge = 0.5
maingrid_renewable_share = 0.3
pv_generation_max = 0.8
",
        );

        let (case, experiment) = read_case_file(dir.path()).unwrap();
        assert_eq!(
            case,
            CaseConfig {
                evaluated_days: 365,
                allow_shortage: true,
                number_of_equal_generators: 2,
                pv_fixed_capacity: CapacityPolicy::Optimised,
                wind_fixed_capacity: CapacityPolicy::Absent,
                genset_fixed_capacity: CapacityPolicy::Fixed(20.0),
                storage_fixed_capacity: CapacityPolicy::Absent,
                pcc_consumption_fixed_capacity: CapacityPolicy::Absent,
                pcc_feedin_fixed_capacity: CapacityPolicy::Absent,
            }
        );
        assert_eq!(
            experiment,
            ExperimentParameters {
                storage_crate_charge: Some(Dimensionless(0.5)),
                maingrid_renewable_share: Dimensionless(0.3),
                pv_generation_max: Some(Dimensionless(0.8)),
                wind_generation_max: None,
            }
        );
    }

    #[test]
    fn test_read_case_file_invalid() {
        let dir = tempdir().unwrap();
        write_case_file(
            dir.path(),
            "[case]
evaluated_days = 7
wind_fixed_capacity = \"optimise\"

[experiment]
maingrid_renewable_share = 0.5
",
        );

        let err = read_case_file(dir.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            input_err_msg(dir.path().join(CASE_FILE_NAME))
        );
        assert_eq!(
            err.root_cause().to_string(),
            "wind_generation_max must be provided if wind capacity is optimised"
        );
    }

    #[test]
    fn test_read_case_file_no_renewable_share() {
        let dir = tempdir().unwrap();
        write_case_file(
            dir.path(),
            "[case]
evaluated_days = 7

[experiment]
storage_Crate_charge = 0.5
",
        );

        let err = read_case_file(dir.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            input_err_msg(dir.path().join(CASE_FILE_NAME))
        );
        assert!(
            err.root_cause()
                .to_string()
                .contains("missing field `maingrid_renewable_share`")
        );
    }

    #[test]
    fn test_read_case_file_no_experiment() {
        let dir = tempdir().unwrap();
        write_case_file(dir.path(), "[case]\nevaluated_days = 7\n");

        let err = read_case_file(dir.path()).unwrap_err();
        assert!(err.root_cause().to_string().contains("missing field `experiment`"));
    }

    #[test]
    fn test_read_case_file_no_crate_charge() {
        let dir = tempdir().unwrap();
        write_case_file(
            dir.path(),
            "[case]
evaluated_days = 7
storage_fixed_capacity = \"optimise\"

[experiment]
maingrid_renewable_share = 0.2
",
        );

        let err = read_case_file(dir.path()).unwrap_err();
        assert_eq!(
            err.root_cause().to_string(),
            "storage_crate_charge must be provided if storage capacity is optimised"
        );

        // A fixed battery does not need it
        write_case_file(
            dir.path(),
            "[case]
evaluated_days = 7
storage_fixed_capacity = 4.0

[experiment]
maingrid_renewable_share = 0.2
",
        );
        let (_, experiment) = read_case_file(dir.path()).unwrap();
        assert_eq!(experiment.storage_crate_charge, None);
    }

    #[test]
    fn test_read_case_file_missing() {
        let dir = tempdir().unwrap();
        assert!(read_case_file(dir.path()).is_err());
    }
}
