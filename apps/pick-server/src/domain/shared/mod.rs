//! Shared kernel: identifiers, time and errors used across contexts.

pub mod errors;
pub mod value_objects;

pub use errors::DomainError;
pub use value_objects::*;
