pub mod keys;

mod revocation_store;

pub use revocation_store::*;
