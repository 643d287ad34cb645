use axum::{Extension, Router, routing::get};
use tokio::net::TcpListener;

use crate::{api, spotify::auth::SharedLoginState};

/// Routes of the local login callback server.
pub fn router(state: SharedLoginState) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Serves the callback routes on a listener the caller has already bound.
pub async fn serve_api(listener: TcpListener, state: SharedLoginState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}
