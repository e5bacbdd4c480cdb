//! Low-level file and clock helpers shared by the wordenc crates.
//!
//! Session state files are written through [`write_text_atomic`] so a turn that
//! fails midway never leaves a half-written record behind.

pub mod atomic_io;
pub mod time_utils;

pub use atomic_io::{read_text_if_exists, write_text_atomic};
pub use time_utils::current_unix_timestamp_ms;
