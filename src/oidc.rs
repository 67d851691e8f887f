//! OIDC domain values: provider identity, token sets, and unsigned claim decoding.

pub mod provider;
pub mod token;

pub use provider::*;
pub use token::*;
