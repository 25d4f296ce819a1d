//! Synthetic billing metrics: catalog, series generation, window resolution
//! and comparison alignment.

pub mod anomaly;
pub mod catalog;
pub mod comparison;
pub mod dummy;
pub mod generator;
pub mod resolver;
pub mod store;
pub mod trend;
