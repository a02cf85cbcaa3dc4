// src/session/store.rs — Durable storage for the session
//
// Two keys under the storage dir: session.json (the whole serialized session)
// and token (the raw auth token, duplicated for quick access by other tools).
// The session manager is the sole writer of both. Every save rewrites the
// entire session, so overlapping refreshes are last-write-wins on the whole
// record; the backend provides no ordering token to arbitrate with.

use std::path::PathBuf;

use tracing::warn;

use super::Session;
use crate::infra::errors::ProxydashError;

const SESSION_FILE: &str = "session.json";
const TOKEN_FILE: &str = "token";

pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    /// Load the persisted session. A corrupt file is discarded and treated as
    /// "no session" — this is the only layer that tolerates corruption, and
    /// only because bootstrap calls it.
    pub fn load(&self) -> Option<Session> {
        let path = self.session_path();
        let content = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("discarding corrupt session file {}: {e}", path.display());
                let _ = std::fs::remove_file(&path);
                None
            }
        }
    }

    /// Persist the whole session plus the raw token key. Atomic write
    /// (tmp + rename), chmod 600 on Unix.
    pub fn save(&self, session: &Session) -> Result<(), ProxydashError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(session)?;
        write_atomic(&self.session_path(), &json)?;
        write_atomic(&self.token_path(), &session.auth_token)?;
        Ok(())
    }

    /// Remove both keys. Idempotent: missing files are fine.
    pub fn clear(&self) -> Result<(), ProxydashError> {
        for path in [self.session_path(), self.token_path()] {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

fn write_atomic(path: &std::path::Path, content: &str) -> std::io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(0o600))?;
    }

    std::fs::rename(&tmp_path, path)
}
