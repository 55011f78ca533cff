//! CLI domain: parse, route, help, output, and presentation only.
//! No list orchestration of its own; the route table drives a `ListController`.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::{exit_code, map_error};
pub use parse::{Cli, Commands};
pub use presentation::{format_ids, format_page_json, format_page_text, format_section_heading};
pub use route::{parse_filter, parse_sort, RunContext};
