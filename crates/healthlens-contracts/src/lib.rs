//! # healthlens-contracts
//!
//! Shared wire types, identifiers, and error contracts for the HealthLens
//! client.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate, only data definitions and error types.

pub mod chat;
pub mod error;
pub mod ids;
pub mod prediction;
