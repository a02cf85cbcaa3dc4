// src/infra/paths.rs — Local storage locations
//
// All persisted state (session, token, backend override) lives under a single
// directory, overridable with PROXYDASH_HOME for isolation. When unset,
// ~/.proxydash is used.

use std::path::PathBuf;

/// Returns the PROXYDASH_HOME override, if set.
fn proxydash_home() -> Option<PathBuf> {
    std::env::var_os("PROXYDASH_HOME").map(PathBuf::from)
}

/// Storage directory: $PROXYDASH_HOME/ or ~/.proxydash/
pub fn storage_dir() -> PathBuf {
    if let Some(home) = proxydash_home() {
        return home;
    }
    dirs_home().join(".proxydash")
}

/// Home directory
pub fn dirs_home() -> PathBuf {
    directories::BaseDirs::new()
        .expect("Could not determine home directory")
        .home_dir()
        .to_path_buf()
}
