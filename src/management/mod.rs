mod auth;
pub mod dump;
mod session;

pub use auth::TokenManager;
pub use session::SessionStore;
