//! # verihire-contracts
//!
//! Shared types and error contracts for the verihire evaluation and audit
//! pipeline.
//!
//! Every crate in the workspace imports from here.  No business logic lives
//! in this crate, only data definitions, leaf projections, and error types.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod log;
pub mod policy;
pub mod snapshot;
