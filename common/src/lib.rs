//! Restaurant order analytics shared by every backend: the canonical
//! models, the report computations, the store contract and the HTTP API.

pub mod analytics;
pub mod config;
pub mod datetime;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod query;
pub mod reports;
pub mod restaurants;
pub mod server;
pub mod store;
