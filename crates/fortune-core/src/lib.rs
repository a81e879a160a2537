//! Fortune AI Core Library
//!
//! Configuration, API clients, and domain types shared by the Fortune AI
//! tracker and command-line front end.

pub mod api;
pub mod config;
pub mod error;
pub mod types;

pub use error::{Error, Result};
