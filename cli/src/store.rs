//! Credential persistence and navigation for a terminal session.
//!
//! The credential lives in a single file; a missing or blank file means
//! logged out. I/O failures are logged and otherwise treated like absence,
//! matching how the browser store behaves when storage is unavailable.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use registry::{Navigator, TokenStore};

const TOKEN_DIR: &str = ".registry";
const TOKEN_FILE: &str = "token";

/// `$HOME/.registry/token`, or `.registry-token` in the working directory
/// when no home directory is known.
#[must_use]
pub fn default_token_path() -> PathBuf {
    token_path_from_home(std::env::var_os("HOME").map(PathBuf::from))
}

fn token_path_from_home(home: Option<PathBuf>) -> PathBuf {
    match home {
        Some(home) if !home.as_os_str().is_empty() => home.join(TOKEN_DIR).join(TOKEN_FILE),
        _ => PathBuf::from(".registry-token"),
    }
}

#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, credential: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, credential)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, credential: &str) {
        if let Err(error) = self.write(credential) {
            tracing::warn!(path = %self.path.display(), %error, "failed to persist credential");
        }
    }

    fn read(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let credential = raw.trim();
                (!credential.is_empty()).then(|| credential.to_owned())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => None,
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "failed to read credential");
                None
            }
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "failed to remove credential");
            }
        }
    }
}

/// A terminal cannot change route. Expiry surfaces through the command's
/// error instead, see [`crate::error::CliError::hint`].
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        tracing::debug!(route = path, "navigation requested");
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
