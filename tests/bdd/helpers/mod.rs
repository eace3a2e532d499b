//! Shared helpers for BDD step definitions.

pub mod tables;
