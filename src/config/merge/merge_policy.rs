//! Merge rules: defaults, override order, conflict handling.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("debounce_ms", 200)?
        .set_default("page_size.initial", 50)?
        .set_default("api.elements_path", "/data/data")?
        .set_default("api.pagination_path", "/data")?
        .set_default("api.total_count_path", "/data/total")?
        .set_default("api.ids_path", "/data")?
        .set_default("api.message_path", "/message")
}
