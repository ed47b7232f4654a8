//! Authentication example demonstrating the authorization-code flow.
//!
//! This example shows how to:
//! - Build the sign-in URL
//! - Exchange the redirect code for tokens
//! - Persist the session with a token store
//! - Restore the session on a later run

use std::io::Write;

use spotifyrs::{Credentials, FileTokenStore, SpotifyClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    // Credentials come from SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET and
    // SPOTIFY_REDIRECT_URI.
    let client = SpotifyClient::new(Credentials::from_env()?)
        .with_token_store(FileTokenStore::in_data_dir())
        .with_authz_refresh_callback(|authz| {
            println!("Tokens refreshed, now expiring at {}", authz.expires_at);
        });

    // A previous session may still be on disk.
    if client.restore_authz().await? {
        println!("Restored a persisted session.");
    } else {
        println!("Open this URL in your browser and approve access:");
        println!("  {}", client.authorize_url());
        println!();
        print!("Paste the `code` parameter from the redirect URL: ");
        std::io::stdout().flush()?;

        let mut code = String::new();
        std::io::stdin().read_line(&mut code)?;

        client.exchange_code_for_token(code.trim()).await?;
        println!("Signed in; tokens persisted for the next run.");
    }

    // Use the session.
    let profile = client.current_user_profile().await?;
    println!(
        "Hello, {}!",
        profile.display_name.as_deref().unwrap_or(&profile.id)
    );

    Ok(())
}
