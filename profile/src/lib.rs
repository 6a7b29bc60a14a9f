//! Editable profile form: field rules and an edit/save/cancel session.
//!
//! The crate keeps a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (rule set, dependency graph,
//!   validation interpreter, session reducer). No I/O; the evaluation date
//!   is always passed in.
//! - **[`io`]**: Side-effecting helpers (snapshot store, config, server data
//!   mapping, text rendering).
//!
//! Orchestration modules ([`edit`], [`import`], [`validate`]) coordinate core
//! logic with I/O to implement CLI commands.

pub mod core;
pub mod edit;
pub mod exit_codes;
pub mod import;
pub mod io;
pub mod logging;
pub mod record;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
