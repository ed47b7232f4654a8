//! Basic search example demonstrating the combined search call.
//!
//! This example shows how to:
//! - Create a client with existing authentication
//! - Search the catalog
//! - Work with the merged, tagged result sequence

use spotifyrs::{Authz, Credentials, SearchResult, SpotifyClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    // Create a client with existing authentication.
    // In a real application, you would load this from storage - see the
    // authentication example.
    let authz = Authz::new("your_access_token", "your_refresh_token", 1_700_000_000);
    let client = SpotifyClient::new(Credentials::from_env()?).with_authz(authz);

    let query = std::env::args().nth(1).unwrap_or_else(|| "daft punk".to_string());
    println!("Searching for: {query}");

    // One call, four content types, merged in a fixed order: tracks first,
    // then albums, playlists and artists.
    let results = client.search(&query).await?;
    println!("Found {} results:", results.len());

    for result in results {
        match result {
            SearchResult::Track(track) => {
                println!("  track:    {} - {}", track.artist_names(), track.name);
            }
            SearchResult::Album(album) => {
                println!("  album:    {} ({})", album.name, album.release_date);
            }
            SearchResult::Playlist(playlist) => {
                println!("  playlist: {}", playlist.name);
            }
            SearchResult::Artist(artist) => {
                println!("  artist:   {}", artist.name);
            }
        }
    }

    Ok(())
}
