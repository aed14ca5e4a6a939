pub mod adapters;
pub mod comparison;
pub mod models;
pub mod narrative;
pub mod report;
