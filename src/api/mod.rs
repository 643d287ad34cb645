//! # API Module
//!
//! HTTP endpoints of the local server that completes the authorization-code
//! login.
//!
//! - [`callback`] - receives the provider redirect carrying `code` or `error`
//! - [`health`] - reports status and version
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use spodump::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
