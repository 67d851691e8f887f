//! Acquisition use cases composing the collaborator contracts.

pub mod get_token;
pub mod standalone;

pub use get_token::*;
pub use standalone::*;
