//! Stable exit codes for profile CLI commands.

/// Command succeeded (snapshot valid, saved, or cancelled).
pub const OK: i32 = 0;
/// Command failed due to missing layout, unreadable files, bad input or other errors.
pub const INVALID: i32 = 1;
/// Field rules rejected the snapshot; nothing was committed.
pub const REJECTED: i32 = 2;
