//! JSONL command trail.

pub mod writer;
