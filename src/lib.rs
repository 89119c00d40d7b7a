pub mod config;
pub mod constants;
pub mod error;
pub mod harvester;
pub mod logging;
pub mod patterns;
pub mod ranker;
pub mod storage;
pub mod types;
pub mod verification;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;
pub mod observability;
