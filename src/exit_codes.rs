//! Exit code constants for the spool CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid job spec)
//! - 2: Configuration failure (unknown recipe, missing rule key)
//! - 3: I/O failure (template/destination/log files)
//! - 4: Submission failure

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid job specification, or unparsable config file.
pub const USER_ERROR: i32 = 1;

/// Configuration failure: unrecognized recipe or a template/rule-table mismatch.
pub const CONFIG_FAILURE: i32 = 2;

/// I/O failure: unreadable template, unwritable destination, or log setup error.
pub const IO_FAILURE: i32 = 3;

/// Submission failure: the scheduler invocation could not be launched.
pub const SUBMIT_FAILURE: i32 = 4;
