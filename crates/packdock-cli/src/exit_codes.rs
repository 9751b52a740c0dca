//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

#![allow(dead_code)]

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Input error - invalid name, URL, or duplicate repository
pub const INPUT_ERROR: i32 = 2;

/// Repository error - unreachable remote, invalid index, or busy registry
pub const REPO_ERROR: i32 = 3;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
