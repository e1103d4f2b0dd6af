//! Assertion tokens, Steam identifiers, and the API credential wrapper.

pub mod id;
pub mod secret;
pub mod token;

pub use id::*;
pub use secret::*;
pub use token::*;
