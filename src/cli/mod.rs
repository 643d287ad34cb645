//! # CLI Module
//!
//! User-facing commands. Each command builds what it needs from the
//! [`Config`](crate::config::Config), talks to the `spotify` and `management`
//! layers and reports progress with the crate's output macros.
//!
//! ```bash
//! spodump login                 # authorization-code login, stores the session
//! spodump playlists             # dump all playlists to JSON
//! spodump playlists --table     # ...and print them as a table
//! spodump token                 # app-only token via client credentials
//! spodump search "Men I Trust"  # app-only artist lookup
//! spodump logout                # forget the stored session
//! ```
//!
//! Commands terminate the process with `error!` on failure; everything below
//! them returns typed errors.

mod login;
mod playlists;
mod search;
mod token;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;

use crate::{config::Config, error};

pub use login::login;
pub use login::logout;
pub use playlists::playlists;
pub use search::search;
pub use token::token;

fn http_client(config: &Config) -> Client {
    match config.http_client() {
        Ok(client) => client,
        Err(e) => error!("Failed to build HTTP client: {}", e),
    }
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
