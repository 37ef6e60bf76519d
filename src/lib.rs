pub mod catalog;
pub mod config;
pub mod docker;
pub mod logging;
pub mod orchestrator;
pub mod server;
pub mod workflows;
