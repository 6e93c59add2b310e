//! Deterministic, pure logic shared by the supervisor.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests.

pub mod classifier;
pub mod policy;
pub mod types;
