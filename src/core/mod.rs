//! Core building blocks shared by every command
//!
//! - **config**: tool parameters from `.qgis-plugin-ci`, `setup.cfg` or `pyproject.toml`
//! - **context**: plugin repository context built once in main.rs
//! - **error**: error types with contextual help messages and exit codes

pub mod config;
pub mod context;
pub mod error;
