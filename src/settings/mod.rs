//! Layered settings (file + environment) and the command line.

mod cli;
pub use clap::{Parser, Subcommand, ValueEnum};
pub use cli::*;

mod settings;
pub use settings::*;
