//! Playlist management example demonstrating how to work with playlists.
//!
//! This example shows how to:
//! - List the user's playlists
//! - Create a new playlist
//! - Add tracks to a playlist
//! - Remove tracks from a playlist
//! - Unfollow a playlist

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

    // Get the user's existing playlists
    println!("Getting user's playlists...");
    let playlists = client.user_playlists().await?;

    println!("Found {} playlists:", playlists.total);
    for playlist in &playlists.items {
        println!("  - {} ({})", playlist.name, playlist.id);
    }

    // Create a new playlist
    println!("\nCreating a new playlist...");
    if !client.create_playlist("spotifyrs Test Playlist").await? {
        println!("Playlist creation was not confirmed, stopping here.");
        return Ok(());
    }

    // The listing now contains the new playlist; grab its id
    let playlists = client.user_playlists().await?;
    let playlist = playlists
        .items
        .iter()
        .find(|playlist| playlist.name == "spotifyrs Test Playlist")
        .ok_or("created playlist not found")?;

    // Search for some tracks to add
    println!("\nSearching for tracks to add...");
    let tracks: Vec<_> = client
        .search("Radiohead")
        .await?
        .into_iter()
        .filter_map(|result| match result {
            SearchResult::Track(track) => Some(track),
            _ => None,
        })
        .take(3)
        .collect();

    if tracks.is_empty() {
        println!("No tracks found to add to playlist");
        return Ok(());
    }

    // Add the tracks to the playlist
    for track in &tracks {
        let added = client.add_track_to_playlist(&track.id, &playlist.id).await?;
        println!(
            "  {} {} - {}",
            if added { "added" } else { "NOT confirmed:" },
            track.artist_names(),
            track.name
        );
    }

    // List the playlist's tracks
    println!("\nTracks in playlist:");
    let details = client.playlist(&playlist.id).await?;
    for (index, item) in details.tracks.items.iter().enumerate() {
        if let Some(track) = &item.track {
            println!("  {}. {} by {}", index + 1, track.name, track.artist_names());
        }
    }

    // Remove the first track again
    if let Some(track) = tracks.first() {
        println!("\nRemoving {} from the playlist...", track.name);
        if client.remove_track_from_playlist(&track.id, &playlist.id).await? {
            println!("Track removed.");
        }
    }

    // Clean up: unfollow the playlist so it disappears from the library
    println!("\nUnfollowing the test playlist...");
    if client.unfollow_playlist(&playlist.id).await? {
        println!("Done.");
    }

    Ok(())
}
