#![doc = include_str!("../README.md")]

mod album;
mod artist;
mod auth;
mod browse;
mod playlist;
mod search;
mod store;
mod track;
mod user;

pub use album::*;
pub use artist::*;
pub use auth::*;
pub use browse::*;
pub use playlist::*;
pub use search::*;
pub use store::*;
pub use track::*;
pub use user::*;

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

pub(crate) static SPOTIFY_API_BASE_URL: &str = "https://api.spotify.com/v1";
pub(crate) static SPOTIFY_ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";

/// Fixed per-request timeout applied to every API call.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Error response from the Spotify Web API.
///
/// Every non-2xx response from the API carries a JSON body of the shape
/// `{"error": {"status": 404, "message": "..."}}`; this is the inner object.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpotifyApiError {
    /// HTTP status code
    pub status: u16,
    /// Human-readable error message
    #[serde(default)]
    pub message: String,
}

impl Display for SpotifyApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Spotify API error: {} {}", self.status, self.message)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: SpotifyApiError,
}

/// Errors that can occur when using the spotifyrs library.
///
/// This enum covers all possible error conditions including network issues,
/// API errors, schema mismatches, and authentication problems.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed (network issues, timeouts, etc.)
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// Spotify API returned an error response
    #[error("Spotify API error: {0}")]
    Api(SpotifyApiError),
    /// The response carried no usable body
    #[error("failed to get data from the Spotify API")]
    DataUnavailable,
    /// JSON body present but does not match the expected schema
    #[error(transparent)]
    Decode(#[from] serde_json::Error),
    /// The authorization server rejected a token exchange or refresh
    #[error("authorization failed: {0}")]
    Auth(String),
    /// No access token available - client needs to sign in first
    #[error("no access token available - have you signed in?")]
    NotSignedIn,
    /// Reading or writing persisted tokens failed
    #[error(transparent)]
    Storage(#[from] std::io::Error),
    /// A credential environment variable is missing
    #[error("missing credential environment variable {0}")]
    MissingCredential(&'static str),
}

/// Callback function type for handling authorization token refresh events.
///
/// This callback is invoked whenever the client automatically refreshes
/// the access token, in addition to any configured [`TokenStore`].
pub type AuthzCallback = Arc<dyn Fn(Authz) + Send + Sync>;

/// Main client for interacting with the Spotify Web API.
///
/// The `SpotifyClient` provides access to Spotify's catalog, search, library
/// and playlist management. It handles authentication, automatic token
/// refresh, and provides type-safe methods for all API operations.
///
/// # Example
///
/// ```no_run
/// use spotifyrs::{Credentials, SpotifyClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = SpotifyClient::new(Credentials::from_env()?);
///
/// // Send the user to the authorization page, then complete the exchange
/// // with the code from the redirect.
/// println!("Visit: {}", client.authorize_url());
/// client.exchange_code_for_token("code_from_redirect").await?;
///
/// // Now use the authenticated client
/// for result in client.search("daft punk").await? {
///     println!("{}", result.name());
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// `SpotifyClient` is designed to be shared across tasks. All methods are
/// async and the client uses internal synchronization for token management:
/// at most one token refresh is in flight at any time, and concurrent callers
/// waiting on it are released in arrival order.
pub struct SpotifyClient {
    pub client: reqwest::Client,
    credentials: Credentials,
    authz: ArcSwapOption<Authz>,
    refresh_semaphore: Semaphore,
    token_store: Option<Arc<dyn TokenStore>>,
    on_authz_refresh_callback: Option<AuthzCallback>,
    api_base_url: String,
    accounts_base_url: String,
}

impl SpotifyClient {
    /// Create a new SpotifyClient with the given application credentials.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use spotifyrs::{Credentials, SpotifyClient};
    ///
    /// let client = SpotifyClient::new(Credentials::new(
    ///     "client_id",
    ///     "client_secret",
    ///     "http://localhost:8888/callback",
    /// ));
    /// ```
    pub fn new(credentials: Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            authz: ArcSwapOption::from(None),
            refresh_semaphore: Semaphore::new(1),
            token_store: None,
            on_authz_refresh_callback: None,
            api_base_url: SPOTIFY_API_BASE_URL.to_string(),
            accounts_base_url: SPOTIFY_ACCOUNTS_BASE_URL.to_string(),
        }
    }

    /// Set a custom HTTP client using the builder pattern.
    ///
    /// Useful when the HTTP client needs custom settings like proxies or
    /// additional default headers. The fixed 30 second request timeout is
    /// applied per request and is kept regardless of the client used.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Set existing authentication tokens using the builder pattern.
    ///
    /// Useful when tokens were previously persisted and the user should not
    /// have to sign in again. The client refreshes them automatically when
    /// they expire.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use spotifyrs::{Authz, Credentials, SpotifyClient};
    ///
    /// let authz = Authz::new("access_token", "refresh_token", 1_700_000_000);
    /// let client = SpotifyClient::new(Credentials::new("id", "secret", "uri"))
    ///     .with_authz(authz);
    /// ```
    pub fn with_authz(mut self, authz: Authz) -> Self {
        self.authz = ArcSwapOption::from_pointee(authz);
        self
    }

    /// Set a durable token store using the builder pattern.
    ///
    /// The store is written after every successful exchange and refresh and
    /// cleared on [`sign_out`](SpotifyClient::sign_out). Use
    /// [`restore_authz`](SpotifyClient::restore_authz) at startup to load a
    /// persisted session.
    pub fn with_token_store<S>(mut self, store: S) -> Self
    where
        S: TokenStore + 'static,
    {
        self.token_store = Some(Arc::new(store));
        self
    }

    /// Set a callback function for authorization token refresh using the
    /// builder pattern.
    ///
    /// The callback is invoked whenever the client refreshes the access
    /// token, after the configured [`TokenStore`] (if any) has been updated.
    pub fn with_authz_refresh_callback<F>(mut self, authz_refresh_callback: F) -> Self
    where
        F: Fn(Authz) + Send + Sync + 'static,
    {
        self.on_authz_refresh_callback = Some(Arc::new(authz_refresh_callback));
        self
    }

    /// Get the current authorization tokens.
    ///
    /// Returns `None` if the client is not authenticated. This is useful for
    /// persisting tokens when shutting down without a [`TokenStore`].
    pub fn get_authz(&self) -> Option<Arc<Authz>> {
        self.authz.load_full()
    }

    // Build and send an authenticated request. Every call goes through the
    // token check first; the bearer header and the fixed timeout are applied
    // here so the per-endpoint methods only deal with paths and payloads.
    pub(crate) async fn request(
        &self,
        method: reqwest::Method,
        url: &str,
        params: Option<serde_json::Value>,
        body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, Error> {
        let token = self.valid_token().await?;

        let mut req = match method {
            reqwest::Method::GET => self.client.get(url),
            reqwest::Method::POST => self.client.post(url),
            reqwest::Method::PUT => self.client.put(url),
            reqwest::Method::DELETE => self.client.delete(url),
            _ => panic!("Invalid method: {}", method),
        };

        req = req.header(reqwest::header::AUTHORIZATION, format!("Bearer {token}"));
        req = req.timeout(REQUEST_TIMEOUT);

        if let Some(params) = params.as_ref() {
            req = req.query(params);
        }

        // .json() also sets the JSON content type
        if let Some(body) = body.as_ref() {
            req = req.json(body);
        }

        Ok(req.send().await?)
    }

    // Send a request and decode the response body into the expected type.
    pub(crate) async fn do_request<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        url: &str,
        params: Option<serde_json::Value>,
        body: Option<serde_json::Value>,
    ) -> Result<T, Error> {
        let resp = self.request(method, url, params, body).await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;

        if status.is_success() {
            if bytes.is_empty() {
                return Err(Error::DataUnavailable);
            }

            // Debug trace the response value
            if log::log_enabled!(log::Level::Trace) {
                if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&bytes) {
                    let pretty_value = serde_json::to_string_pretty(&value).unwrap_or_default();
                    log::trace!("Requested URL: {}", url);
                    log::trace!("Response {}", pretty_value);
                }
            }

            match serde_json::from_slice::<T>(&bytes) {
                Ok(t) => Ok(t),
                Err(e) => {
                    if log::log_enabled!(log::Level::Debug) {
                        log::debug!("Requested URL: {}", url);
                        log::debug!("JSON deserialization error: {}", e);
                        log::debug!("Response: {}", String::from_utf8_lossy(&bytes));
                    }
                    Err(Error::Decode(e))
                }
            }
        } else {
            if bytes.is_empty() {
                return Err(Error::DataUnavailable);
            }

            match serde_json::from_slice::<ErrorBody>(&bytes) {
                Ok(err_body) => {
                    if log::log_enabled!(log::Level::Debug) {
                        log::debug!("Requested URL: {}", url);
                        log::debug!("Spotify API error: {}", err_body.error);
                    }
                    Err(Error::Api(err_body.error))
                }
                Err(_) => Err(Error::DataUnavailable),
            }
        }
    }
}

// Mutation responses confirm success through a single string field
// (`id`, `snapshot_id`) rather than the status code alone.
pub(crate) fn body_confirms(body: &[u8], field: &str) -> bool {
    serde_json::from_slice::<serde_json::Value>(body)
        .map(|value| value.get(field).and_then(serde_json::Value::as_str).is_some())
        .unwrap_or(false)
}

/// An image reference returned by the API.
///
/// Spotify returns images as explicit URLs with optional dimensions; the
/// largest variant comes first.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Image {
    /// Source URL of the image
    pub url: String,
    /// Height of the image in pixels, when known
    pub height: Option<u32>,
    /// Width of the image in pixels, when known
    pub width: Option<u32>,
}

/// A paginated list response from the Spotify Web API.
///
/// This generic structure is used for all paginated endpoints and provides
/// information about the current page and total available items.
///
/// # Example
///
/// ```no_run
/// use spotifyrs::{Page, Playlist, SpotifyClient};
///
/// # async fn example(client: SpotifyClient) -> Result<(), Box<dyn std::error::Error>> {
/// let playlists: Page<Playlist> = client.user_playlists().await?;
///
/// println!("Showing {} of {} playlists", playlists.items.len(), playlists.total);
/// for playlist in playlists.items {
///     println!("Playlist: {}", playlist.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// API URL of the current page
    #[serde(default)]
    pub href: Option<String>,
    /// Maximum number of items per page
    #[serde(default)]
    pub limit: u32,
    /// Offset of the current page
    #[serde(default)]
    pub offset: u32,
    /// Total number of items available
    #[serde(default)]
    pub total: u32,
    /// URL of the next page, if any
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page, if any
    #[serde(default)]
    pub previous: Option<String>,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    // The number of items left to fetch
    pub fn num_left(&self) -> usize {
        (self.total as usize)
            .saturating_sub(self.offset as usize)
            .saturating_sub(self.items.len())
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            href: None,
            limit: 0,
            offset: 0,
            total: 0,
            next: None,
            previous: None,
        }
    }
}

// Utility function to deserialize a null value as a default value
pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    Option::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::stub_server;

    fn test_client(api_base_url: String) -> SpotifyClient {
        let mut client = SpotifyClient::new(Credentials::new("id", "secret", "uri"))
            .with_authz(Authz::new("token", "refresh", far_future()));
        client.api_base_url = api_base_url;
        client
    }

    fn far_future() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[tokio::test]
    async fn decode_mismatch_is_reported_as_decode_error() {
        let server = stub_server(vec![(200, r#"{"unexpected": true}"#.to_string())]).await;
        let client = test_client(server.base_url.clone());

        let result = client.current_user_profile().await;
        assert!(matches!(result, Err(Error::Decode(_))));
    }

    #[tokio::test]
    async fn api_error_body_is_decoded() {
        let server = stub_server(vec![(
            404,
            r#"{"error": {"status": 404, "message": "Not found."}}"#.to_string(),
        )])
        .await;
        let client = test_client(server.base_url.clone());

        match client.current_user_profile().await {
            Err(Error::Api(err)) => {
                assert_eq!(err.status, 404);
                assert_eq!(err.message, "Not found.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_error_body_is_data_unavailable() {
        let server = stub_server(vec![(500, String::new())]).await;
        let client = test_client(server.base_url.clone());

        let result = client.current_user_profile().await;
        assert!(matches!(result, Err(Error::DataUnavailable)));
    }

    #[tokio::test]
    async fn empty_success_body_is_data_unavailable() {
        let server = stub_server(vec![(200, String::new())]).await;
        let client = test_client(server.base_url.clone());

        let result = client.current_user_profile().await;
        assert!(matches!(result, Err(Error::DataUnavailable)));
    }

    #[tokio::test]
    async fn bearer_header_is_sent_on_every_call() {
        let server = stub_server(vec![(200, r#"{"id": "u1"}"#.to_string())]).await;
        let client = test_client(server.base_url.clone());

        client.current_user_profile().await.unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert!(
            requests[0]
                .headers
                .to_ascii_lowercase()
                .contains("authorization: bearer token"),
            "missing bearer header in: {}",
            requests[0].headers
        );
    }

    #[test]
    fn body_confirms_requires_string_field() {
        assert!(body_confirms(br#"{"snapshot_id": "abc"}"#, "snapshot_id"));
        assert!(!body_confirms(br#"{"snapshot_id": 42}"#, "snapshot_id"));
        assert!(!body_confirms(br#"{"other": "abc"}"#, "snapshot_id"));
        assert!(!body_confirms(b"not json", "snapshot_id"));
    }

    #[test]
    fn page_num_left() {
        let page: Page<u32> = Page {
            items: vec![1, 2, 3],
            total: 10,
            offset: 3,
            ..Default::default()
        };
        assert_eq!(page.num_left(), 4);
        assert!(!page.is_empty());
    }
}
