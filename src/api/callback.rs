use std::collections::HashMap;

use axum::{Extension, extract::Query, response::Html};

use crate::{spotify::auth::SharedLoginState, warning};

/// Receives the provider redirect and records either the `code` or the
/// `error` for the waiting login flow. The token exchange happens there.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<SharedLoginState>,
) -> Html<&'static str> {
    let mut state = shared_state.lock().await;
    let Some(login) = state.as_mut() else {
        return Html("<h4>No login in progress.</h4>");
    };

    if params.get("state") != Some(&login.expected_state) {
        warning!("Ignoring callback with unexpected state parameter");
        return Html("<h4>Invalid login state.</h4>");
    }

    if let Some(error) = params.get("error") {
        login.outcome = Some(Err(error.clone()));
        return Html("<h4>Login failed.</h4>");
    }

    match params.get("code") {
        Some(code) => {
            login.outcome = Some(Ok(code.clone()));
            Html("<h2>Login successful.</h2><p>You can close this browser window.</p>")
        }
        None => Html("<h4>Missing authorization code.</h4>"),
    }
}
