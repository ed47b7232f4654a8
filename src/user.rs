use crate::Error;
use crate::Image;
use crate::SpotifyClient;
use crate::deserialize_null_default;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Profile of the authenticated user.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserProfile {
    /// Unique user identifier
    pub id: String,
    /// Display name chosen by the user, when set
    #[serde(default)]
    pub display_name: Option<String>,
    /// Email address on the account
    #[serde(default)]
    pub email: Option<String>,
    /// Two-letter country code of the account
    #[serde(default)]
    pub country: Option<String>,
    /// Subscription level, e.g. "premium" or "free"
    #[serde(default)]
    pub product: Option<String>,
    /// Profile images, largest first
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub images: Vec<Image>,
    /// Links to this profile on the Spotify web player
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl SpotifyClient {
    /// Get the authenticated user's profile.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: spotifyrs::SpotifyClient) -> Result<(), Box<dyn std::error::Error>> {
    /// let profile = client.current_user_profile().await?;
    /// println!(
    ///     "Signed in as {} ({})",
    ///     profile.display_name.as_deref().unwrap_or(&profile.id),
    ///     profile.product.as_deref().unwrap_or("unknown plan"),
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub async fn current_user_profile(&self) -> Result<UserProfile, Error> {
        let url = format!("{}/me", self.api_base_url);
        self.do_request(Method::GET, &url, None, None).await
    }
}
