//! spodump library
//!
//! Logs into the Spotify Web API and materializes paginated collections,
//! most notably all playlists of the current user.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local login callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Typed errors for auth, fetching, config and session
//! - `management` - Token lifecycle, session persistence and JSON output
//! - `server` - Local HTTP server for the login redirect
//! - `spotify` - Spotify accounts service and Web API client
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use spodump::{config::{self, Config}, management::TokenManager, spotify};
//!
//! #[tokio::main]
//! async fn main() -> spodump::Res<()> {
//!     config::load_env().await?;
//!     let config = Config::from_env()?;
//!     let client = config.http_client()?;
//!     let record = spotify::auth::login(&client, &config).await?;
//!     let manager = TokenManager::new(client.clone(), config.clone(), record);
//!     let playlists = spotify::playlists::get_user_playlists(&client, &config, &manager).await?;
//!     println!("{} playlists", playlists.items.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for the command layer.
///
/// Library functions return their typed errors; commands that chain several
/// of them box the error instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// ```
/// info!("Fetching playlists...");
/// info!("Found {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only for the command layer: library code returns typed errors instead.
///
/// ```
/// error!("Failed to load configuration: {}", e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
