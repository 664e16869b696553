//! Host platform utility functions

use std::{env, path::PathBuf};

/// Environment variable pointing at the root of the software installation.
pub const SW_ROOT_ENV_VAR: &str = "KORUZA_ALIGN_ROOT";

/// Get the root directory of the software, as given by the `KORUZA_ALIGN_ROOT` environment
/// variable.
pub fn get_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}

/// Get the name of the host, if it can be determined from the environment.
pub fn get_hostname() -> Option<String> {
    env::var("HOSTNAME")
        .ok()
        .or_else(|| std::fs::read_to_string("/etc/hostname").ok())
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
}
