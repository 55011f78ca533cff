//! Configuration sources, in increasing order of precedence.

pub mod environment;
pub mod global_file;
pub mod workspace_file;
