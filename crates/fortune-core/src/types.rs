//! Core domain types for the Fortune AI system.

pub mod prediction;
pub mod token;

pub use prediction::*;
pub use token::*;
