//! Command implementations.

mod emit;
mod info;
mod validate;

pub use emit::run_emit;
pub use info::run_info;
pub use validate::run_validate;

use std::path::Path;

use config_loader::{ConfigLoader, EnvOverrides};
use contracts::GathererSettings;
use tracing::info;

use crate::error::{CliError, Result};

/// Load settings from `path` with environment overrides applied
pub(crate) fn load_settings(path: &Path) -> Result<GathererSettings> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()));
    }

    let overrides = EnvOverrides::from_env();
    if !overrides.is_empty() {
        info!(?overrides, "Applying environment overrides");
    }

    Ok(ConfigLoader::load_from_path_with(path, &overrides)?)
}
