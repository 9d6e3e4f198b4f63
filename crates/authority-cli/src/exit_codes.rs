//! Exit codes for the `authority` binary.
//! Registry rejections use `RegistryError::exit_code()`; these cover the rest.

pub const SUCCESS: i32 = 0;
pub const NOT_ACTIVE: i32 = 1; // `is-active` on a missing or inactive authority
pub const FATAL: i32 = 2; // Config, state file or I/O failure
