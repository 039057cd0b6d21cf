pub mod cli;
pub mod commands;
pub mod teloscan;
pub mod utils;
