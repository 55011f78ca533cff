//! Integration tests for the crudlist list controller

mod config_integration;
mod debounce;
mod delete_and_insert;
mod pagination;
