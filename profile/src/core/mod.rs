//! Deterministic, pure logic for the profile form.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! snapshots, take the evaluation date as an argument, and return
//! deterministic outputs suitable for tests.

pub mod age;
pub mod dependencies;
pub mod rules;
pub mod session;
pub mod types;
pub mod validator;
