//! # verihire-core
//!
//! The evaluation pipeline and the trait seams it is wired through.
//!
//! - [`traits::Scorer`] turns a `CandidateInput` into a scored record plus
//!   policy checks, with no side effects.
//! - [`traits::AuditSink`] persists the record and the signed audit snapshot.
//! - [`agent::HiringAgent`] runs the two in order and refuses to return a
//!   record whose audit trail was not persisted.
//! - [`config`] loads the TOML configuration shared by every component.

pub mod agent;
pub mod config;
pub mod traits;

pub use agent::{HiringAgent, MAX_BATCH};
