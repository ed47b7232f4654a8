use crate::Artist;
use crate::Error;
use crate::Image;
use crate::Page;
use crate::SpotifyClient;
use crate::Track;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use strum_macros::{AsRefStr, EnumString};

/// Types of albums in the Spotify catalog.
#[derive(Default, Debug, Serialize, Deserialize, EnumString, AsRefStr, PartialEq, Eq, Copy, Clone)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AlbumType {
    /// Standard album release
    #[default]
    Album,
    /// Single track release
    Single,
    /// Compilation album
    Compilation,
}

/// Represents an album from the Spotify catalog.
///
/// This is the simplified album object embedded in tracks, search results
/// and release listings; see [`AlbumDetails`] for the full object with the
/// track listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    /// Unique album identifier
    pub id: String,
    /// Album title
    pub name: String,
    /// Type of album (album, single, compilation)
    #[serde(default)]
    pub album_type: AlbumType,
    /// Artists who contributed to this album
    #[serde(default)]
    pub artists: Vec<Artist>,
    /// Cover images, largest first
    #[serde(default)]
    pub images: Vec<Image>,
    /// Release date; precision varies from full dates to bare years
    #[serde(default)]
    pub release_date: String,
    /// Total number of tracks on the album
    #[serde(default)]
    pub total_tracks: u32,
    /// Markets the album is available in
    #[serde(default)]
    pub available_markets: Vec<String>,
    /// Links to this album on the Spotify web player
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl Album {
    /// URL of the album cover, when one is available.
    pub fn cover_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }
}

/// Full album object returned by the album details endpoint, including the
/// first page of its tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumDetails {
    /// Unique album identifier
    pub id: String,
    /// Album title
    pub name: String,
    /// Type of album (album, single, compilation)
    #[serde(default)]
    pub album_type: AlbumType,
    /// Artists who contributed to this album
    #[serde(default)]
    pub artists: Vec<Artist>,
    /// Cover images, largest first
    #[serde(default)]
    pub images: Vec<Image>,
    /// Release date; precision varies from full dates to bare years
    #[serde(default)]
    pub release_date: String,
    /// Total number of tracks on the album
    #[serde(default)]
    pub total_tracks: u32,
    /// Record label
    #[serde(default)]
    pub label: Option<String>,
    /// Genres associated with the album
    #[serde(default)]
    pub genres: Vec<String>,
    /// Popularity score, 0-100
    #[serde(default)]
    pub popularity: Option<u32>,
    /// The album's tracks
    pub tracks: Page<Track>,
    /// Links to this album on the Spotify web player
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl AlbumDetails {
    /// URL of the album cover, when one is available.
    pub fn cover_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }
}

/// An album saved in the user's library, with the save timestamp.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SavedAlbum {
    /// ISO timestamp when the album was saved
    pub added_at: String,
    /// The album data
    pub album: Album,
}

impl SpotifyClient {
    /// Get full album details, including the album's tracks.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: spotifyrs::SpotifyClient) -> Result<(), Box<dyn std::error::Error>> {
    /// let album = client.album("4aawyAB9vmqN3uQ7FjRGTy").await?;
    /// println!("Album: {} ({} tracks)", album.name, album.total_tracks);
    /// for track in &album.tracks.items {
    ///     println!("  {}. {}", track.track_number, track.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn album(&self, album_id: &str) -> Result<AlbumDetails, Error> {
        let url = format!("{}/albums/{album_id}", self.api_base_url);
        self.do_request(Method::GET, &url, None, None).await
    }

    /// Get the albums saved in the authenticated user's library.
    pub async fn saved_albums(&self) -> Result<Page<SavedAlbum>, Error> {
        let url = format!("{}/me/albums", self.api_base_url);
        self.do_request(Method::GET, &url, None, None).await
    }

    /// Save an album to the authenticated user's library.
    ///
    /// Returns whether the API confirmed the save with a 200 status; any
    /// other status on a completed call reports `false`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: spotifyrs::SpotifyClient) -> Result<(), Box<dyn std::error::Error>> {
    /// if client.save_album("4aawyAB9vmqN3uQ7FjRGTy").await? {
    ///     println!("Album saved!");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn save_album(&self, album_id: &str) -> Result<bool, Error> {
        let url = format!("{}/me/albums", self.api_base_url);
        let params = serde_json::json!({ "ids": album_id });

        let resp = self.request(Method::PUT, &url, Some(params), None).await?;

        Ok(resp.status() == reqwest::StatusCode::OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::stub_server;
    use crate::{Authz, Credentials};

    fn make_client(api_base_url: String) -> SpotifyClient {
        let mut client = SpotifyClient::new(Credentials::new("id", "secret", "uri")).with_authz(
            Authz::new("token", "refresh", chrono::Utc::now().timestamp() + 3600),
        );
        client.api_base_url = api_base_url;
        client
    }

    #[tokio::test]
    async fn save_album_reports_true_only_for_status_200() {
        let server = stub_server(vec![(200, "{}".to_string())]).await;
        let client = make_client(server.base_url.clone());
        assert!(client.save_album("abc").await.unwrap());

        let request = &server.requests()[0];
        assert_eq!(request.method, "PUT");
        assert_eq!(request.path, "/me/albums?ids=abc");

        let server = stub_server(vec![(201, "{}".to_string())]).await;
        let client = make_client(server.base_url.clone());
        assert!(!client.save_album("abc").await.unwrap());
    }

    #[tokio::test]
    async fn saved_albums_decodes_the_library_page() {
        let body = r#"{
            "items": [
                {
                    "added_at": "2023-06-01T10:00:00Z",
                    "album": {
                        "id": "alb1",
                        "name": "Discovery",
                        "album_type": "album",
                        "artists": [{"id": "art1", "name": "Daft Punk"}],
                        "images": [{"url": "https://i.scdn.co/image/abc", "height": 640, "width": 640}],
                        "release_date": "2001-03-07",
                        "total_tracks": 14
                    }
                }
            ],
            "limit": 20,
            "offset": 0,
            "total": 1
        }"#;
        let server = stub_server(vec![(200, body.to_string())]).await;
        let client = make_client(server.base_url.clone());

        let page = client.saved_albums().await.unwrap();
        assert_eq!(page.total, 1);
        let saved = &page.items[0];
        assert_eq!(saved.added_at, "2023-06-01T10:00:00Z");
        assert_eq!(saved.album.name, "Discovery");
        assert_eq!(saved.album.album_type, AlbumType::Album);
        assert_eq!(saved.album.cover_url(), Some("https://i.scdn.co/image/abc"));
    }

    #[tokio::test]
    async fn album_details_include_the_track_listing() {
        let body = r#"{
            "id": "alb1",
            "name": "Discovery",
            "album_type": "album",
            "artists": [{"id": "art1", "name": "Daft Punk"}],
            "release_date": "2001-03-07",
            "total_tracks": 2,
            "label": "Virgin",
            "tracks": {
                "items": [
                    {"id": "t1", "name": "One More Time", "track_number": 1},
                    {"id": "t2", "name": "Aerodynamic", "track_number": 2}
                ],
                "limit": 50,
                "offset": 0,
                "total": 2
            }
        }"#;
        let server = stub_server(vec![(200, body.to_string())]).await;
        let client = make_client(server.base_url.clone());

        let album = client.album("alb1").await.unwrap();
        assert_eq!(server.requests()[0].path, "/albums/alb1");
        assert_eq!(album.label.as_deref(), Some("Virgin"));
        assert_eq!(album.tracks.items.len(), 2);
        assert_eq!(album.tracks.items[1].name, "Aerodynamic");
    }
}
