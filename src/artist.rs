use crate::Image;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents an artist from the Spotify catalog.
///
/// Endpoints that embed artists inside albums and tracks return a simplified
/// object carrying only the identity fields; everything else defaults to
/// empty.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Artist {
    /// Unique artist identifier
    pub id: String,
    /// Artist name
    pub name: String,
    /// Artist images, largest first (full artist object only)
    #[serde(default)]
    pub images: Vec<Image>,
    /// Genres associated with the artist (full artist object only)
    #[serde(default)]
    pub genres: Vec<String>,
    /// Popularity score, 0-100 (full artist object only)
    #[serde(default)]
    pub popularity: Option<u32>,
    /// Links to this artist on the Spotify web player
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

impl Artist {
    /// URL of the artist's image, when one is available.
    pub fn image_url(&self) -> Option<&str> {
        self.images.first().map(|image| image.url.as_str())
    }
}
