//! Shared helpers for tests and benchmarks.

pub mod data;
