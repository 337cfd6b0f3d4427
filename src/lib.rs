//! Data pipeline behind the CORD-19 explorer dashboard.
//!
//! The desktop shell in `main.rs` only drives [`data::cache::DatasetCache`]
//! and [`data::summary::DashboardSummary`]; everything that touches the
//! records lives in this library so it can be tested without a window.

pub mod config;
pub mod data;
