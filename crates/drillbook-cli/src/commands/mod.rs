pub mod export;
pub mod init;
pub mod run;
pub mod stats;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use drillbook_core::config::{load_config_from, DrillbookConfig};

/// Load the config and apply command-line overrides on top.
pub fn load_settings(
    config_path: Option<&Path>,
    catalog: Option<PathBuf>,
    save_file: Option<PathBuf>,
) -> Result<DrillbookConfig> {
    let mut config = load_config_from(config_path)?;
    if let Some(catalog) = catalog {
        config.catalog = catalog;
    }
    if let Some(save_file) = save_file {
        config.save_file = save_file;
    }
    Ok(config)
}

pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
