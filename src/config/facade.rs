//! Config loader: the only entry point for building a `ListConfig` from disk and env.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::ListConfig;
use config::{ConfigError, File};
use std::path::{Path, PathBuf};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace directory.
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables (`CRUDLIST__*`)
    /// 2. Workspace files (`config/config.toml`, `config/{CRUDLIST_ENV}.toml`)
    /// 3. Global file (`~/.config/crudlist/config.toml`)
    /// 4. Defaults
    pub fn load(workspace_root: &Path) -> Result<ListConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load configuration from one explicit file; environment still overrides it.
    pub fn load_from_file(path: &Path) -> Result<ListConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let builder = merge_policy::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Location of the user-level config file, if HOME or XDG_CONFIG_HOME is set.
    pub fn xdg_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
