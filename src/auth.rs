use crate::Error;
use crate::REQUEST_TIMEOUT;
use crate::SpotifyClient;
use base64::Engine;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::SemaphorePermit;
use url::Url;

/// Scopes requested during interactive sign-in.
pub(crate) static AUTH_SCOPES: &str = "user-read-private user-read-email playlist-read-private playlist-modify-public playlist-modify-private user-library-read user-library-modify";

/// Tokens are treated as expired this many seconds before the literal
/// expiration instant, so a near-expiry token is never raced.
pub(crate) const TOKEN_EXPIRY_MARGIN_SECS: i64 = 300;

/// Spotify application credentials.
///
/// Obtained from the Spotify developer dashboard. The redirect URI must match
/// one registered for the application.
#[derive(Clone, Debug)]
pub struct Credentials {
    /// Application client ID
    pub client_id: String,
    /// Application client secret
    pub client_secret: String,
    /// Redirect URI registered for the application
    pub redirect_uri: String,
}

impl Credentials {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Read credentials from the `SPOTIFY_CLIENT_ID`, `SPOTIFY_CLIENT_SECRET`
    /// and `SPOTIFY_REDIRECT_URI` environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Ok(Self {
            client_id: env_var("SPOTIFY_CLIENT_ID")?,
            client_secret: env_var("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: env_var("SPOTIFY_REDIRECT_URI")?,
        })
    }
}

fn env_var(name: &'static str) -> Result<String, Error> {
    std::env::var(name).map_err(|_| Error::MissingCredential(name))
}

/// Authorization tokens for API access.
///
/// This structure contains the authentication data needed to make
/// authenticated requests to the Spotify Web API. It can be serialized and
/// stored persistently (see [`TokenStore`](crate::TokenStore)) to avoid
/// re-authentication.
///
/// # Example
///
/// ```no_run
/// use spotifyrs::{Authz, Credentials, SpotifyClient};
///
/// // Create Authz from stored tokens
/// let authz = Authz::new("access_token", "refresh_token", 1_700_000_000);
///
/// // Create client with existing authentication
/// let client = SpotifyClient::new(Credentials::new("id", "secret", "uri"))
///     .with_authz(authz);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Authz {
    /// Access token for API authentication
    pub access_token: String,
    /// Refresh token for obtaining new access tokens
    pub refresh_token: String,
    /// Unix timestamp (seconds) at which the access token expires
    pub expires_at: i64,
}

impl Authz {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: i64,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at,
        }
    }

    /// Whether the access token must be refreshed before use.
    ///
    /// Evaluated with the safety margin: a token inside the final 300 seconds
    /// of its lifetime already counts as expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.expires_at - TOKEN_EXPIRY_MARGIN_SECS
    }
}

/// Token response from the accounts service, for both the
/// authorization-code and the refresh-token grants.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub expires_in: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenErrorBody {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl TokenErrorBody {
    fn message(&self) -> String {
        match &self.error_description {
            Some(description) => format!("{}: {}", self.error, description),
            None => self.error.clone(),
        }
    }
}

impl SpotifyClient {
    /// Whether a (non-empty) access token is stored.
    ///
    /// True after a completed code exchange or a restored session, until
    /// [`sign_out`](SpotifyClient::sign_out).
    pub fn is_signed_in(&self) -> bool {
        self.get_authz()
            .map(|authz| !authz.access_token.is_empty())
            .unwrap_or(false)
    }

    /// The URL to open in a browser for interactive sign-in.
    ///
    /// After the user approves access, the browser is redirected to the
    /// configured redirect URI with a `code` query parameter; pass that code
    /// to [`exchange_code_for_token`](SpotifyClient::exchange_code_for_token).
    pub fn authorize_url(&self) -> String {
        let url = Url::parse_with_params(
            &format!("{}/authorize", self.accounts_base_url),
            &[
                ("response_type", "code"),
                ("client_id", self.credentials.client_id.as_str()),
                ("scope", AUTH_SCOPES),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
                ("show_dialog", "TRUE"),
            ],
        )
        .expect("authorize URL is well-formed");
        url.to_string()
    }

    /// Complete interactive sign-in by exchanging the authorization code for
    /// tokens.
    ///
    /// On success the tokens are stored in the client and written to the
    /// configured [`TokenStore`](crate::TokenStore), if any.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use spotifyrs::{Credentials, SpotifyClient};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = SpotifyClient::new(Credentials::from_env()?);
    /// println!("Visit: {}", client.authorize_url());
    /// // ... user signs in, redirect carries ?code=...
    /// client.exchange_code_for_token("code_from_redirect").await?;
    /// assert!(client.is_signed_in());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn exchange_code_for_token(&self, code: &str) -> Result<(), Error> {
        let resp = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.credentials.redirect_uri.as_str()),
            ])
            .await?;

        let refresh_token = resp
            .refresh_token
            .ok_or_else(|| Error::Auth("no refresh token in authorization response".to_string()))?;

        let authz = Authz {
            access_token: resp.access_token,
            refresh_token,
            expires_at: Utc::now().timestamp() + resp.expires_in,
        };

        self.authz.store(Some(Arc::new(authz.clone())));
        self.persist_authz(&authz).await;

        Ok(())
    }

    /// Get a currently-valid access token for API calls.
    ///
    /// Returns the stored token immediately when it is still fresh per the
    /// expiry safety margin, without touching the network. When it has
    /// expired, a single refresh is performed no matter how many callers
    /// arrive concurrently; all of them wait on it and are released in
    /// arrival order. A failed refresh is reported to every waiting caller.
    pub async fn valid_token(&self) -> Result<String, Error> {
        let authz = self.get_authz().ok_or(Error::NotSignedIn)?;
        if !authz.is_expired() {
            return Ok(authz.access_token.clone());
        }

        self.refresh_access_token().await?;

        let authz = self.get_authz().ok_or(Error::NotSignedIn)?;
        if authz.is_expired() {
            // We waited on a refresh that did not produce a usable token
            return Err(Error::Auth("token refresh failed".to_string()));
        }
        Ok(authz.access_token.clone())
    }

    /// Refresh the access token using the stored refresh token.
    ///
    /// Does nothing when the stored token is still fresh. At most one refresh
    /// network call is in flight at any time; callers finding one in progress
    /// wait for it instead of starting another. The refresh token only
    /// rotates when the response carries a new one.
    pub async fn refresh_access_token(&self) -> Result<(), Error> {
        // Try to become the single refresher
        let permit: Option<SemaphorePermit> = match self.refresh_semaphore.try_acquire() {
            Ok(p) => Some(p),
            Err(_) => None,
        };

        match permit {
            // We're the single refresher, fetch the new token and update the client
            Some(permit) => {
                let authz = self.get_authz().ok_or(Error::NotSignedIn)?;

                // A refresh that resolved while we raced for the permit
                // already did the work
                if !authz.is_expired() {
                    return Ok(());
                }

                let resp = self
                    .token_request(&[
                        ("grant_type", "refresh_token"),
                        ("refresh_token", authz.refresh_token.as_str()),
                    ])
                    .await?;

                let new_authz = Authz {
                    access_token: resp.access_token,
                    refresh_token: resp
                        .refresh_token
                        .unwrap_or_else(|| authz.refresh_token.clone()),
                    expires_at: Utc::now().timestamp() + resp.expires_in,
                };

                // Single, quick swap visible to all readers
                self.authz.store(Some(Arc::new(new_authz.clone())));

                drop(permit);

                self.persist_authz(&new_authz).await;

                // invoke callback if set
                if let Some(cb) = &self.on_authz_refresh_callback {
                    cb(new_authz);
                }

                Ok(())
            }
            None => {
                // Someone else is refreshing - acquire then drop to wait for
                // the in-flight refresh to finish. Waiters are admitted in
                // arrival order.
                let _ = self.refresh_semaphore.acquire().await;
                Ok(())
            }
        }
    }

    /// Sign out, clearing in-memory and persisted token state.
    ///
    /// Always succeeds from the caller's point of view; a failure to clear
    /// the persistent store is logged and not surfaced.
    pub async fn sign_out(&self) {
        self.authz.store(None);

        if let Some(store) = &self.token_store {
            if let Err(e) = store.clear().await {
                log::warn!("Failed to clear persisted tokens: {}", e);
            }
        }
    }

    /// Load a previously persisted session from the configured
    /// [`TokenStore`](crate::TokenStore).
    ///
    /// Returns `Ok(true)` when tokens were found and installed, `Ok(false)`
    /// when there is no store or nothing persisted.
    pub async fn restore_authz(&self) -> Result<bool, Error> {
        let Some(store) = &self.token_store else {
            return Ok(false);
        };

        match store.load().await? {
            Some(authz) => {
                self.authz.store(Some(Arc::new(authz)));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponse, Error> {
        let url = format!("{}/api/token", self.accounts_base_url);

        let resp = self
            .client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.basic_authorization())
            .timeout(REQUEST_TIMEOUT)
            .form(form)
            .send()
            .await?;

        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            let detail = serde_json::from_slice::<TokenErrorBody>(&bytes)
                .map(|body| body.message())
                .unwrap_or_else(|_| {
                    format!("token endpoint returned status {}", status.as_u16())
                });
            if log::log_enabled!(log::Level::Debug) {
                log::debug!("Requested URL: {}", url);
                log::debug!("Authorization error: {}", detail);
            }
            return Err(Error::Auth(detail));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    // Client credentials for the accounts service, per RFC 6749 section 2.3.1.
    fn basic_authorization(&self) -> String {
        let pair = format!(
            "{}:{}",
            self.credentials.client_id, self.credentials.client_secret
        );
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(pair)
        )
    }

    pub(crate) async fn persist_authz(&self, authz: &Authz) {
        if let Some(store) = &self.token_store {
            if let Err(e) = store.save(authz).await {
                log::warn!("Failed to persist tokens: {}", e);
            }
        }
    }
}
