//! Common functionality for mgeval.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod case;
pub mod cli;
pub mod evaluate;
pub mod flows;
pub mod id;
pub mod input;
pub mod log;
pub mod metrics;
pub mod output;
pub mod results;
pub mod scenario;
pub mod settings;
pub mod time_series;
pub mod units;

#[cfg(test)]
mod fixture;

/// Get the config dir for the program
pub fn get_mgeval_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        panic!("Could not get path to config dir");
    };

    config_dir.push("mgeval");
    config_dir
}
