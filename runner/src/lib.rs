pub mod config;
pub mod estimate;
pub mod executors;
pub mod generate;
pub mod layout;
pub mod logging;
pub mod plan;
pub mod sweep;
pub mod template;
