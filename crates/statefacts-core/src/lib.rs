//! Core types, reference data, and fun-fact rules for the statefacts API.
//!
//! This crate is free of HTTP and database dependencies. The storage backend
//! is reached through the [`store::FunFactStore`] trait; the HTTP layer calls
//! into [`engine::StatesEngine`].

pub mod engine;
pub mod error;
pub mod funfact;
pub mod reference;
pub mod state;
pub mod store;
pub mod view;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
