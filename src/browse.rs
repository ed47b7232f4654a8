use crate::Album;
use crate::Error;
use crate::Image;
use crate::Page;
use crate::Playlist;
use crate::SpotifyClient;
use crate::Track;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A browse category from the Spotify catalog.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Category {
    /// Unique category identifier
    pub id: String,
    /// Category name
    pub name: String,
    /// Category icons, largest first
    #[serde(default)]
    pub icons: Vec<Image>,
}

impl Category {
    /// URL of the category icon, when one is available.
    pub fn icon_url(&self) -> Option<&str> {
        self.icons.first().map(|icon| icon.url.as_str())
    }
}

// The browse endpoints wrap their page under a single key.
#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    categories: Page<Category>,
}

#[derive(Debug, Deserialize)]
struct CategoryPlaylistsResponse {
    playlists: Page<Playlist>,
}

#[derive(Debug, Deserialize)]
struct NewReleasesResponse {
    albums: Page<Album>,
}

#[derive(Debug, Deserialize)]
struct GenreSeedsResponse {
    genres: Vec<String>,
}

/// Featured playlists for a market, with the editorial message shown above
/// them.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FeaturedPlaylists {
    /// Editorial message, e.g. "Popular Playlists"
    #[serde(default)]
    pub message: Option<String>,
    /// The featured playlists
    pub playlists: Page<Playlist>,
}

/// Recommended tracks generated from seed genres.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Recommendations {
    /// The seeds the recommendations were generated from
    #[serde(default)]
    pub seeds: Vec<RecommendationSeed>,
    /// The recommended tracks
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// One seed a recommendations response was generated from.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecommendationSeed {
    /// Seed value (genre name, artist id or track id)
    pub id: String,
    /// Kind of seed, e.g. "GENRE"
    #[serde(rename = "type")]
    pub seed_type: String,
}

impl SpotifyClient {
    /// Get all browse categories.
    pub async fn categories(&self) -> Result<Page<Category>, Error> {
        let url = format!("{}/browse/categories", self.api_base_url);

        let resp: CategoriesResponse = self.do_request(Method::GET, &url, None, None).await?;

        Ok(resp.categories)
    }

    /// Get the playlists filed under a browse category.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: spotifyrs::SpotifyClient) -> Result<(), Box<dyn std::error::Error>> {
    /// for category in client.categories().await?.items {
    ///     let playlists = client.category_playlists(&category.id).await?;
    ///     println!("{}: {} playlists", category.name, playlists.total);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn category_playlists(&self, category_id: &str) -> Result<Page<Playlist>, Error> {
        let url = format!(
            "{}/browse/categories/{category_id}/playlists",
            self.api_base_url
        );

        let resp: CategoryPlaylistsResponse =
            self.do_request(Method::GET, &url, None, None).await?;

        Ok(resp.playlists)
    }

    /// Get newly released albums.
    pub async fn new_releases(&self) -> Result<Page<Album>, Error> {
        let url = format!("{}/browse/new-releases", self.api_base_url);
        let params = serde_json::json!({ "limit": 50 });

        let resp: NewReleasesResponse =
            self.do_request(Method::GET, &url, Some(params), None).await?;

        Ok(resp.albums)
    }

    /// Get the current featured playlists.
    pub async fn featured_playlists(&self) -> Result<FeaturedPlaylists, Error> {
        let url = format!("{}/browse/featured-playlists", self.api_base_url);
        let params = serde_json::json!({ "country": "TR" });

        self.do_request(Method::GET, &url, Some(params), None).await
    }

    /// Get the genre seeds accepted by the recommendations endpoint.
    pub async fn recommended_genres(&self) -> Result<Vec<String>, Error> {
        let url = format!(
            "{}/recommendations/available-genre-seeds",
            self.api_base_url
        );

        let resp: GenreSeedsResponse = self.do_request(Method::GET, &url, None, None).await?;

        Ok(resp.genres)
    }

    /// Get track recommendations for a set of seed genres.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::collections::HashSet;
    ///
    /// # async fn example(client: spotifyrs::SpotifyClient) -> Result<(), Box<dyn std::error::Error>> {
    /// let genres: HashSet<String> = client
    ///     .recommended_genres()
    ///     .await?
    ///     .into_iter()
    ///     .take(3)
    ///     .collect();
    ///
    /// for track in client.recommendations(&genres).await?.tracks {
    ///     println!("{} - {}", track.artist_names(), track.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn recommendations(
        &self,
        seed_genres: &HashSet<String>,
    ) -> Result<Recommendations, Error> {
        let seeds = seed_genres
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let url = format!("{}/recommendations", self.api_base_url);
        let params = serde_json::json!({ "limit": 40, "seed_genres": seeds });

        self.do_request(Method::GET, &url, Some(params), None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::stub_server;
    use crate::{Authz, Credentials};

    fn client(api_base_url: String) -> SpotifyClient {
        let mut client = SpotifyClient::new(Credentials::new("id", "secret", "uri")).with_authz(
            Authz::new("token", "refresh", chrono::Utc::now().timestamp() + 3600),
        );
        client.api_base_url = api_base_url;
        client
    }

    #[tokio::test]
    async fn categories_unwraps_the_envelope() {
        let body = r#"{
            "categories": {
                "items": [
                    {"id": "toplists", "name": "Top Lists", "icons": [{"url": "https://i.scdn.co/image/cat"}]},
                    {"id": "rock", "name": "Rock", "icons": []}
                ],
                "limit": 20,
                "offset": 0,
                "total": 2
            }
        }"#;
        let server = stub_server(vec![(200, body.to_string())]).await;
        let client = client(server.base_url.clone());

        let categories = client.categories().await.unwrap();
        assert_eq!(server.requests()[0].path, "/browse/categories");
        assert_eq!(categories.items.len(), 2);
        assert_eq!(categories.items[0].icon_url(), Some("https://i.scdn.co/image/cat"));
        assert_eq!(categories.items[1].icon_url(), None);
    }

    #[tokio::test]
    async fn new_releases_requests_fifty_albums() {
        let body = r#"{
            "albums": {
                "items": [{"id": "alb1", "name": "Fresh", "album_type": "single"}],
                "limit": 50,
                "offset": 0,
                "total": 1
            }
        }"#;
        let server = stub_server(vec![(200, body.to_string())]).await;
        let client = client(server.base_url.clone());

        let albums = client.new_releases().await.unwrap();
        assert_eq!(server.requests()[0].path, "/browse/new-releases?limit=50");
        assert_eq!(albums.items[0].album_type, crate::AlbumType::Single);
    }

    #[tokio::test]
    async fn recommendations_join_the_seed_genres() {
        let body = r#"{
            "seeds": [{"id": "rock", "type": "GENRE"}],
            "tracks": [{"id": "t1", "name": "Recommended"}]
        }"#;
        let server = stub_server(vec![(200, body.to_string())]).await;
        let client = client(server.base_url.clone());

        let seeds: HashSet<String> = ["rock".to_string()].into_iter().collect();
        let recommendations = client.recommendations(&seeds).await.unwrap();

        let path = &server.requests()[0].path;
        assert!(path.starts_with("/recommendations?"));
        assert!(path.contains("limit=40"));
        assert!(path.contains("seed_genres=rock"));
        assert_eq!(recommendations.tracks.len(), 1);
        assert_eq!(recommendations.seeds[0].seed_type, "GENRE");
    }

    #[tokio::test]
    async fn featured_playlists_carry_the_editorial_message() {
        let body = r#"{
            "message": "Editor's picks",
            "playlists": {
                "items": [{"id": "pl1", "name": "Chill", "owner": {"id": "spotify"}}],
                "limit": 20,
                "offset": 0,
                "total": 1
            }
        }"#;
        let server = stub_server(vec![(200, body.to_string())]).await;
        let client = client(server.base_url.clone());

        let featured = client.featured_playlists().await.unwrap();
        assert_eq!(server.requests()[0].path, "/browse/featured-playlists?country=TR");
        assert_eq!(featured.message.as_deref(), Some("Editor's picks"));
        assert_eq!(featured.playlists.items[0].name, "Chill");
    }

    #[tokio::test]
    async fn genre_seeds_unwrap_to_a_plain_list() {
        let body = r#"{"genres": ["acoustic", "afrobeat", "rock"]}"#;
        let server = stub_server(vec![(200, body.to_string())]).await;
        let client = client(server.base_url.clone());

        let genres = client.recommended_genres().await.unwrap();
        assert_eq!(
            server.requests()[0].path,
            "/recommendations/available-genre-seeds"
        );
        assert_eq!(genres, vec!["acoustic", "afrobeat", "rock"]);
    }
}
