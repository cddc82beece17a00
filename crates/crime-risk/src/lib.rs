pub mod config;
pub mod error;
pub mod neighbourhoods;
pub mod telemetry;
