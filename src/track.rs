use crate::Album;
use crate::Artist;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents a track from the Spotify catalog.
///
/// This structure contains all available information about a track,
/// including metadata and associated album/artist data.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Track {
    /// Unique track identifier
    pub id: String,
    /// Track title
    pub name: String,
    /// Artists who contributed to this track
    #[serde(default)]
    pub artists: Vec<Artist>,

    /// Album the track belongs to
    ///
    /// Absent inside album track listings, where the album is the enclosing
    /// object.
    #[serde(default)]
    pub album: Option<Album>,

    /// Duration of the track in milliseconds
    #[serde(default)]
    pub duration_ms: u64,
    /// Whether the track contains explicit content
    #[serde(default)]
    pub explicit: bool,
    /// Disc the track is on (relevant for multi-disc albums)
    #[serde(default)]
    pub disc_number: u32,
    /// Track number within the album
    #[serde(default)]
    pub track_number: u32,
    /// Popularity score, 0-100
    #[serde(default)]
    pub popularity: Option<u32>,

    /// 30 second audio preview; not available for every track
    #[serde(default)]
    pub preview_url: Option<String>,
    /// Links to this track on the Spotify web player
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl Track {
    /// The track's Spotify URI, as used by the playlist mutation endpoints.
    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.id)
    }

    /// Names of the contributing artists, joined for display.
    pub fn artist_names(&self) -> String {
        self.artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
