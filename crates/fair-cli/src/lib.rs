//! Command-line front end for FAIR scoring: argument parsing, logging setup,
//! report formatting and heatmap output.

pub mod cli;
pub mod logging;
pub mod progress;
pub mod report;
pub mod run;

pub use cli::{Cli, Command};
pub use logging::init_logging;
pub use run::run;
