use crate::Album;
use crate::Artist;
use crate::Error;
use crate::Page;
use crate::Playlist;
use crate::SpotifyClient;
use crate::Track;
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Response of the combined search endpoint: four parallel paged lists, one
/// per content type.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SearchResponse {
    /// Matching tracks
    #[serde(skip_serializing_if = "Page::is_empty")]
    #[serde(default)]
    pub tracks: Page<Track>,

    /// Matching albums
    #[serde(skip_serializing_if = "Page::is_empty")]
    #[serde(default)]
    pub albums: Page<Album>,

    /// Matching playlists
    #[serde(skip_serializing_if = "Page::is_empty")]
    #[serde(default)]
    pub playlists: Page<Playlist>,

    /// Matching artists
    #[serde(skip_serializing_if = "Page::is_empty")]
    #[serde(default)]
    pub artists: Page<Artist>,
}

impl SearchResponse {
    /// Merge the four result lists into one sequence of tagged values.
    ///
    /// The order is a fixed priority - tracks, then albums, playlists and
    /// artists - not relevance across types.
    pub fn into_results(self) -> Vec<SearchResult> {
        let mut results: Vec<SearchResult> = Vec::new();
        results.extend(self.tracks.items.into_iter().map(SearchResult::Track));
        results.extend(self.albums.items.into_iter().map(SearchResult::Album));
        results.extend(self.playlists.items.into_iter().map(SearchResult::Playlist));
        results.extend(self.artists.items.into_iter().map(SearchResult::Artist));
        results
    }
}

/// A unified result type over everything a search can return.
///
/// This enum allows handling the different content types in a type-safe way
/// while keeping them in one ordered sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "item", rename_all = "lowercase")]
pub enum SearchResult {
    /// Track result
    Track(Track),
    /// Album result
    Album(Album),
    /// Playlist result
    Playlist(Playlist),
    /// Artist result
    Artist(Artist),
}

impl SearchResult {
    pub fn id(&self) -> &str {
        match self {
            SearchResult::Track(track) => &track.id,
            SearchResult::Album(album) => &album.id,
            SearchResult::Playlist(playlist) => &playlist.id,
            SearchResult::Artist(artist) => &artist.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            SearchResult::Track(track) => &track.name,
            SearchResult::Album(album) => &album.name,
            SearchResult::Playlist(playlist) => &playlist.name,
            SearchResult::Artist(artist) => &artist.name,
        }
    }
}

impl SpotifyClient {
    /// Search the catalog across albums, artists, playlists and tracks.
    ///
    /// One combined call is issued and the four result lists are merged into
    /// a single sequence, tracks first, then albums, playlists and artists.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use spotifyrs::SearchResult;
    ///
    /// # async fn example(client: spotifyrs::SpotifyClient) -> Result<(), Box<dyn std::error::Error>> {
    /// for result in client.search("aerodynamic").await? {
    ///     match result {
    ///         SearchResult::Track(track) => println!("track: {}", track.name),
    ///         SearchResult::Album(album) => println!("album: {}", album.name),
    ///         SearchResult::Playlist(playlist) => println!("playlist: {}", playlist.name),
    ///         SearchResult::Artist(artist) => println!("artist: {}", artist.name),
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, Error> {
        let url = format!("{}/search", self.api_base_url);
        let params = serde_json::json!({
            "limit": 10,
            "type": "album,artist,playlist,track",
            "q": query,
        });

        let resp: SearchResponse = self.do_request(Method::GET, &url, Some(params), None).await?;

        Ok(resp.into_results())
    }
}
