//! CLI command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string for log fields (e.g. "list", "delete").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::List { .. } => "list",
        Commands::Ids { .. } => "ids",
        Commands::Delete { .. } => "delete",
        Commands::Config => "config",
    }
}
