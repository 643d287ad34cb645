//! # Spotify Integration Module
//!
//! Everything that talks to the Spotify accounts service or the Web API.
//!
//! ```text
//! CLI layer
//!     ↓
//! management (TokenManager, SessionStore)
//!     ↓
//! spotify
//!     ├── auth        grants, refresh, bearer header, login flow
//!     ├── pagination  cursor walking over page envelopes
//!     ├── playlists   /me/playlists
//!     └── artists     /search
//!     ↓
//! reqwest
//! ```
//!
//! ## Token lifecycle
//!
//! ```text
//! UNAUTHENTICATED --acquire--> ACTIVE --now > expires_at--> EXPIRED
//!                                 ^                            |
//!                                 +--------- refresh ----------+
//! ```
//!
//! An expired record without a refresh token (client-credentials grant) can
//! only be replaced by a new `acquire`.
//!
//! ## Error Types
//!
//! - [`crate::error::AuthError`] for token endpoint exchanges
//! - [`crate::error::FetchError`] for resource reads
//!
//! Neither is retried automatically, except the single retry of a page after
//! a 401 once the token has been refreshed.

pub mod artists;
pub mod auth;
pub mod pagination;
pub mod playlists;
