//! Tracing setup. The binaries boot with `info` and switch to the configured
//! filter once settings are read.

mod logger;
pub use logger::*;

pub use tracing::{debug, error, info, trace, warn};
