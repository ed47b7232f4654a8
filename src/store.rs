use crate::Authz;
use crate::Error;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Durable storage for authorization tokens.
///
/// The client writes to the store after every successful code exchange and
/// token refresh, clears it on sign-out, and reads it back through
/// [`restore_authz`](crate::SpotifyClient::restore_authz). Implement this to
/// keep tokens somewhere other than the filesystem (keychain, database, ...).
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<Authz>, Error>;
    async fn save(&self, authz: &Authz) -> Result<(), Error>;
    async fn clear(&self) -> Result<(), Error>;
}

/// A [`TokenStore`] backed by a JSON file.
///
/// # Example
///
/// ```no_run
/// use spotifyrs::{Credentials, FileTokenStore, SpotifyClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SpotifyClient::new(Credentials::from_env()?)
///     .with_token_store(FileTokenStore::in_data_dir());
///
/// if client.restore_authz().await? {
///     println!("session restored");
/// }
/// # Ok(())
/// # }
/// ```
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store tokens under the platform's local data directory
    /// (`<data dir>/spotifyrs/authz.json`).
    pub fn in_data_dir() -> Self {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("spotifyrs");
        path.push("authz.json");
        Self { path }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<Authz>, Error> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Storage(e)),
        };

        let authz = serde_json::from_str(&contents)?;
        Ok(Some(authz))
    }

    async fn save(&self, authz: &Authz) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(authz)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Storage(e)),
        }
    }
}
