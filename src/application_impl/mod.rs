#[cfg(test)]
pub(crate) mod failing_store;
mod jwt_codec;
mod session_service_impl;
mod token_issuer;
mod token_validator;

pub use jwt_codec::*;
pub use session_service_impl::*;
pub use token_issuer::*;
pub use token_validator::*;
