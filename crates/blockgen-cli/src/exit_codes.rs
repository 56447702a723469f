//! Process exit codes. Part of the CLI contract; scripts branch on them.

pub const SUCCESS: i32 = 0;
pub const GENERATION_FAILED: i32 = 1; // Sink (writer) rejected a block
pub const CONFIG_ERROR: i32 = 2; // Bad profile, unknown builtin, bad flags
pub const CANCELLED: i32 = 130; // Interrupted between blocks
