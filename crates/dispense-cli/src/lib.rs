//! Library side of the `dispense-forecast` command.

pub mod config;
pub mod logging;
pub mod pipeline;
pub mod types;
