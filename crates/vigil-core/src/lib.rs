//! # vigil-core
//!
//! Core types, ID prefixes, and error types for Vigil.
//!
//! This crate provides the foundational types shared across all Vigil crates:
//! - Entity structs for detected changes, checkpoints, metric comparisons and
//!   match proposals
//! - Status, scope and assessment enums with their state tables
//! - The fixed horizon domain (7/14/30/60/90 days)
//! - Engine commands handed to the imperative shell, and their trail envelope
//! - Cross-cutting error types

pub mod commands;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
