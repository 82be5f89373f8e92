pub mod api;
pub mod config;
pub mod engine;
pub mod jobs;
pub mod observability;
