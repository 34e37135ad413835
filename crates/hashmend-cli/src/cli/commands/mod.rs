//! CLI command handlers, one file per command.

mod checksum;
mod hash;
mod verify;

pub use checksum::run_checksum;
pub use hash::run_hash;
pub use verify::{run_verify, VerifyArgs};
