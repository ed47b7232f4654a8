use crate::Error;
use crate::Image;
use crate::Page;
use crate::SpotifyClient;
use crate::Track;
use crate::body_confirms;
use crate::deserialize_null_default;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents a playlist from the Spotify catalog.
///
/// This is the simplified playlist object returned by listing endpoints; see
/// [`PlaylistDetails`] for the full object with the track listing.
#[derive(Default, Debug, Serialize, Deserialize, Clone)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: String,
    /// Playlist name
    pub name: String,
    /// Playlist description; the API returns null for playlists without one
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub description: String,
    /// Cover images, largest first; null for brand-new playlists
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub images: Vec<Image>,
    /// Who owns the playlist
    #[serde(default)]
    pub owner: PlaylistOwner,
    /// Version marker updated by every playlist mutation
    #[serde(default)]
    pub snapshot_id: Option<String>,
    /// Whether the playlist is publicly visible, when known
    #[serde(default)]
    pub public: Option<bool>,
    /// Links to this playlist on the Spotify web player
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl Playlist {
    /// URL of the playlist cover, when one is available.
    pub fn cover_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }
}

/// Information about the owner of a playlist.
#[derive(Default, Debug, Serialize, Deserialize, Clone)]
pub struct PlaylistOwner {
    /// The user ID of the playlist owner
    #[serde(default)]
    pub id: String,
    /// Display name of the owner, when set
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Full playlist object returned by the playlist details endpoint, including
/// the first page of its tracks.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaylistDetails {
    /// Unique playlist identifier
    pub id: String,
    /// Playlist name
    pub name: String,
    /// Playlist description; the API returns null for playlists without one
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub description: String,
    /// Cover images, largest first
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub images: Vec<Image>,
    /// Who owns the playlist
    #[serde(default)]
    pub owner: PlaylistOwner,
    /// Version marker updated by every playlist mutation
    #[serde(default)]
    pub snapshot_id: Option<String>,
    /// The playlist's track entries
    pub tracks: Page<PlaylistItem>,
    /// Links to this playlist on the Spotify web player
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

/// One entry in a playlist's track listing.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaylistItem {
    /// ISO timestamp when the track was added, when known
    #[serde(default)]
    pub added_at: Option<String>,
    /// The track itself; null when it is no longer available
    pub track: Option<Track>,
}

impl SpotifyClient {
    /// Get playlist details, including the playlist's tracks.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: spotifyrs::SpotifyClient) -> Result<(), Box<dyn std::error::Error>> {
    /// let playlist = client.playlist("37i9dQZF1DXcBWIGoYBM5M").await?;
    /// println!("Playlist: {}", playlist.name);
    /// for item in playlist.tracks.items.iter().filter_map(|item| item.track.as_ref()) {
    ///     println!("  {} - {}", item.artist_names(), item.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn playlist(&self, playlist_id: &str) -> Result<PlaylistDetails, Error> {
        let url = format!("{}/playlists/{playlist_id}", self.api_base_url);
        self.do_request(Method::GET, &url, None, None).await
    }

    /// Get the authenticated user's playlists.
    pub async fn user_playlists(&self) -> Result<Page<Playlist>, Error> {
        let url = format!("{}/me/playlists", self.api_base_url);
        let params = serde_json::json!({ "limit": 50 });
        self.do_request(Method::GET, &url, Some(params), None).await
    }

    /// Create a new playlist for the authenticated user.
    ///
    /// The current profile is fetched first so the playlist is created under
    /// the signed-in user's id. Returns whether the API confirmed the
    /// creation with a playlist `id`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: spotifyrs::SpotifyClient) -> Result<(), Box<dyn std::error::Error>> {
    /// if client.create_playlist("Road Trip").await? {
    ///     println!("Created!");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_playlist(&self, name: &str) -> Result<bool, Error> {
        let profile = self.current_user_profile().await?;

        let url = format!("{}/users/{}/playlists", self.api_base_url, profile.id);
        let body = serde_json::json!({ "name": name });

        let resp = self.request(Method::POST, &url, None, Some(body)).await?;
        let bytes = resp.bytes().await?;

        Ok(body_confirms(&bytes, "id"))
    }

    /// Add a track to a playlist.
    ///
    /// Returns whether the API confirmed the mutation with a `snapshot_id`;
    /// a response without one reports `false` even when the call itself
    /// succeeded.
    pub async fn add_track_to_playlist(
        &self,
        track_id: &str,
        playlist_id: &str,
    ) -> Result<bool, Error> {
        let url = format!("{}/playlists/{playlist_id}/tracks", self.api_base_url);
        let body = serde_json::json!({
            "uris": [format!("spotify:track:{track_id}")]
        });

        let resp = self.request(Method::POST, &url, None, Some(body)).await?;
        let bytes = resp.bytes().await?;

        Ok(body_confirms(&bytes, "snapshot_id"))
    }

    /// Remove all occurrences of a track from a playlist.
    ///
    /// Returns whether the API confirmed the mutation with a `snapshot_id`.
    pub async fn remove_track_from_playlist(
        &self,
        track_id: &str,
        playlist_id: &str,
    ) -> Result<bool, Error> {
        let url = format!("{}/playlists/{playlist_id}/tracks", self.api_base_url);
        let body = serde_json::json!({
            "tracks": [{ "uri": format!("spotify:track:{track_id}") }]
        });

        let resp = self.request(Method::DELETE, &url, None, Some(body)).await?;
        let bytes = resp.bytes().await?;

        Ok(body_confirms(&bytes, "snapshot_id"))
    }

    /// Stop following a playlist, removing it from the user's library.
    ///
    /// Returns whether the API confirmed the unfollow with a 200 status.
    pub async fn unfollow_playlist(&self, playlist_id: &str) -> Result<bool, Error> {
        let url = format!("{}/playlists/{playlist_id}/followers", self.api_base_url);

        let resp = self.request(Method::DELETE, &url, None, None).await?;

        Ok(resp.status() == reqwest::StatusCode::OK)
    }
}
