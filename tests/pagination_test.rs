mod common;

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use common::{MockServer, Reply, http_client};
use reqwest::StatusCode;
use serde_json::{Value, json};
use spodump::{
    error::{AuthError, FetchError},
    management::TokenManager,
    spotify::{
        auth::now,
        pagination::{StaticBearer, fetch_all},
        playlists::get_user_playlists,
    },
    types::{Page, TokenRecord},
};

fn bearer(token: &str) -> StaticBearer {
    StaticBearer::new(TokenRecord {
        access_token: token.to_string(),
        refresh_token: None,
        expires_at: i64::MAX,
    })
}

fn page(base: &str, n: u32, items: Value, next: Option<u32>) -> String {
    let previous = (n > 1).then(|| format!("{base}/pages/{}", n - 1));
    json!({
        "href": format!("{base}/pages/{n}"),
        "items": items,
        "limit": 2,
        "next": next.map(|m| format!("{base}/pages/{m}")),
        "offset": (n - 1) * 2,
        "previous": previous,
        "total": 5,
    })
    .to_string()
}

fn three_pages(hit: &common::Hit, base: &str) -> Reply {
    match hit.path.as_str() {
        "/pages/1" => Reply::json(200, page(base, 1, json!(["a", "b"]), Some(2))),
        "/pages/2" => Reply::json(200, page(base, 2, json!(["c"]), Some(3))),
        "/pages/3" => Reply::json(200, page(base, 3, json!(["d", "e"]), None)),
        _ => Reply::json(404, "{}"),
    }
}

#[tokio::test]
async fn test_fetch_all_concatenates_pages_in_order() {
    let server = MockServer::start(three_pages).await;

    let result: Page<String> = fetch_all(&http_client(), &server.url("/pages/1"), &bearer("t"))
        .await
        .unwrap();

    assert_eq!(result.items, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(result.href, Some(server.url("/pages/3")));
    assert_eq!(result.previous, Some(server.url("/pages/2")));
    assert_eq!(result.next, None);
    // remaining envelope fields come from the first page
    assert_eq!(result.extra["offset"], json!(0));
    assert_eq!(result.extra["total"], json!(5));

    let paths: Vec<String> = server.hits().into_iter().map(|h| h.path).collect();
    assert_eq!(paths, vec!["/pages/1", "/pages/2", "/pages/3"]);
    assert!(
        server
            .hits()
            .iter()
            .all(|h| h.authorization.as_deref() == Some("Bearer t"))
    );
}

#[tokio::test]
async fn test_fetch_all_single_page_is_unmodified() {
    let server = MockServer::start(|_, base| {
        Reply::json(200, page(base, 1, json!([{"id": "p1"}, {"id": "p2"}]), None))
    })
    .await;

    let result: Page<Value> = fetch_all(&http_client(), &server.url("/pages/1"), &bearer("t"))
        .await
        .unwrap();
    let expected: Page<Value> = serde_json::from_str(&page(
        &server.base,
        1,
        json!([{"id": "p1"}, {"id": "p2"}]),
        None,
    ))
    .unwrap();

    assert_eq!(result, expected);
    assert_eq!(server.hits().len(), 1);
}

#[tokio::test]
async fn test_fetch_all_continues_past_empty_page() {
    let server = MockServer::start(|hit, base| match hit.path.as_str() {
        "/pages/1" => Reply::json(200, page(base, 1, json!([]), Some(2))),
        _ => Reply::json(200, page(base, 2, json!(["x"]), None)),
    })
    .await;

    let result: Page<String> = fetch_all(&http_client(), &server.url("/pages/1"), &bearer("t"))
        .await
        .unwrap();

    assert_eq!(result.items, vec!["x"]);
}

#[tokio::test]
async fn test_fetch_all_missing_items_is_an_error() {
    let server = MockServer::start(|hit, base| match hit.path.as_str() {
        "/pages/1" => Reply::json(200, page(base, 1, json!(["a"]), Some(2))),
        _ => Reply::json(200, json!({"next": null, "href": "x"}).to_string()),
    })
    .await;

    let result: Result<Page<String>, _> =
        fetch_all(&http_client(), &server.url("/pages/1"), &bearer("t")).await;

    match result {
        Err(FetchError::Malformed { url, reason }) => {
            assert_eq!(url, server.url("/pages/2"));
            assert!(reason.contains("items"));
        }
        other => panic!("expected malformed page, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_all_missing_next_is_an_error() {
    let server =
        MockServer::start(|_, _| Reply::json(200, json!({"items": ["a"]}).to_string())).await;

    let result: Result<Page<String>, _> =
        fetch_all(&http_client(), &server.url("/pages/1"), &bearer("t")).await;

    assert!(matches!(result, Err(FetchError::Malformed { .. })));
}

#[tokio::test]
async fn test_fetch_all_items_not_an_array_is_an_error() {
    let server = MockServer::start(|_, _| {
        Reply::json(200, json!({"items": "nope", "next": null}).to_string())
    })
    .await;

    let result: Result<Page<Value>, _> =
        fetch_all(&http_client(), &server.url("/pages/1"), &bearer("t")).await;

    assert!(matches!(result, Err(FetchError::Malformed { .. })));
}

#[tokio::test]
async fn test_fetch_all_status_error_mid_walk() {
    let server = MockServer::start(|hit, base| match hit.path.as_str() {
        "/pages/1" => Reply::json(200, page(base, 1, json!(["a"]), Some(2))),
        _ => Reply::json(500, r#"{"error":{"status":500}}"#),
    })
    .await;

    let result: Result<Page<String>, _> =
        fetch_all(&http_client(), &server.url("/pages/1"), &bearer("t")).await;

    match result {
        Err(FetchError::Status { status, url }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(url, server.url("/pages/2"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_all_rejects_cursor_cycle() {
    let server = MockServer::start(|hit, base| match hit.path.as_str() {
        "/pages/1" => Reply::json(200, page(base, 1, json!(["a"]), Some(2))),
        _ => Reply::json(200, page(base, 2, json!(["b"]), Some(1))),
    })
    .await;

    let result: Result<Page<String>, _> =
        fetch_all(&http_client(), &server.url("/pages/1"), &bearer("t")).await;

    assert!(matches!(result, Err(FetchError::Malformed { .. })));
    assert_eq!(server.hits().len(), 2);
}

#[tokio::test]
async fn test_static_bearer_cannot_recover_from_401() {
    let server = MockServer::start(|_, _| Reply::json(401, r#"{"error":"expired"}"#)).await;

    let result: Result<Page<String>, _> =
        fetch_all(&http_client(), &server.url("/pages/1"), &bearer("t")).await;

    assert!(matches!(
        result,
        Err(FetchError::Auth(AuthError::MissingRefreshToken))
    ));
}

/// Resource pages accept only `Bearer fresh`; the token endpoint hands it out.
fn refreshing_api(token_calls: Arc<AtomicUsize>) -> impl Fn(&common::Hit, &str) -> Reply {
    move |hit: &common::Hit, base: &str| {
        if hit.path == "/api/token" {
            token_calls.fetch_add(1, Ordering::SeqCst);
            return Reply::json(200, r#"{"access_token":"fresh","expires_in":3600}"#);
        }
        if hit.authorization.as_deref() != Some("Bearer fresh") {
            return Reply::json(401, r#"{"error":{"status":401}}"#);
        }
        three_pages(hit, base)
    }
}

#[tokio::test]
async fn test_fetch_all_refreshes_once_after_401() {
    let token_calls = Arc::new(AtomicUsize::new(0));
    let server = MockServer::start(refreshing_api(Arc::clone(&token_calls))).await;
    let record = TokenRecord {
        access_token: "revoked".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        expires_at: now() + 3600,
    };
    let manager = TokenManager::new(http_client(), server.config(), record);

    let result: Page<String> = fetch_all(&http_client(), &server.url("/pages/1"), &manager)
        .await
        .unwrap();

    assert_eq!(result.items, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(token_calls.load(Ordering::SeqCst), 1);

    let current = manager.record().await;
    assert_eq!(current.access_token, "fresh");
    assert_eq!(current.refresh_token.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn test_fetch_all_gives_up_after_second_401() {
    let server = MockServer::start(|hit, _| {
        if hit.path == "/api/token" {
            return Reply::json(200, r#"{"access_token":"still-bad","expires_in":3600}"#);
        }
        Reply::json(401, r#"{"error":{"status":401}}"#)
    })
    .await;
    let record = TokenRecord {
        access_token: "revoked".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        expires_at: now() + 3600,
    };
    let manager = TokenManager::new(http_client(), server.config(), record);

    let result: Result<Page<String>, _> =
        fetch_all(&http_client(), &server.url("/pages/1"), &manager).await;

    match result {
        Err(FetchError::Status { status, .. }) => assert_eq!(status, StatusCode::UNAUTHORIZED),
        other => panic!("expected 401, got {:?}", other),
    }
    assert_eq!(server.hits_to("/pages/1").len(), 2);
    assert_eq!(server.hits_to("/api/token").len(), 1);
}

#[tokio::test]
async fn test_expired_record_is_refreshed_before_first_page() {
    let token_calls = Arc::new(AtomicUsize::new(0));
    let server = MockServer::start(refreshing_api(Arc::clone(&token_calls))).await;
    let record = TokenRecord {
        access_token: "old".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        expires_at: now() - 10,
    };
    let manager = TokenManager::new(http_client(), server.config(), record);

    let result: Page<String> = fetch_all(&http_client(), &server.url("/pages/1"), &manager)
        .await
        .unwrap();

    assert_eq!(result.items.len(), 5);
    assert_eq!(token_calls.load(Ordering::SeqCst), 1);
    // no request ever went out with the expired token
    assert!(
        server
            .hits()
            .iter()
            .filter(|h| h.path.starts_with("/pages"))
            .all(|h| h.authorization.as_deref() == Some("Bearer fresh"))
    );
}

#[tokio::test]
async fn test_expired_record_without_refresh_token_needs_login() {
    let server = MockServer::start(three_pages).await;
    let record = TokenRecord {
        access_token: "app".to_string(),
        refresh_token: None,
        expires_at: now() - 10,
    };
    let manager = TokenManager::new(http_client(), server.config(), record);

    let result: Result<Page<String>, _> =
        fetch_all(&http_client(), &server.url("/pages/1"), &manager).await;

    assert!(matches!(
        result,
        Err(FetchError::Auth(AuthError::MissingRefreshToken))
    ));
    assert!(server.hits().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_share_one_refresh() {
    let token_calls = Arc::new(AtomicUsize::new(0));
    let server = MockServer::start(refreshing_api(Arc::clone(&token_calls))).await;
    let record = TokenRecord {
        access_token: "old".to_string(),
        refresh_token: Some("refresh-1".to_string()),
        expires_at: now() - 10,
    };
    let manager = TokenManager::new(http_client(), server.config(), record);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let manager = manager.clone();
        handles.push(tokio::spawn(async move { manager.valid_header().await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(token_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_get_user_playlists() {
    let server = MockServer::start(|hit, base| {
        let playlist = |id: &str| json!({"id": id, "name": format!("Playlist {id}")});
        match (hit.path.as_str(), hit.query.as_deref()) {
            ("/v1/me/playlists", Some("limit=50")) => Reply::json(
                200,
                json!({
                    "href": format!("{base}/v1/me/playlists?limit=50"),
                    "items": [playlist("1"), playlist("2")],
                    "limit": 50,
                    "next": format!("{base}/v1/me/playlists?offset=50&limit=50"),
                    "offset": 0,
                    "previous": null,
                    "total": 3,
                })
                .to_string(),
            ),
            ("/v1/me/playlists", Some("offset=50&limit=50")) => Reply::json(
                200,
                json!({
                    "href": format!("{base}/v1/me/playlists?offset=50&limit=50"),
                    "items": [playlist("3")],
                    "limit": 50,
                    "next": null,
                    "offset": 50,
                    "previous": format!("{base}/v1/me/playlists?limit=50"),
                    "total": 3,
                })
                .to_string(),
            ),
            _ => Reply::json(404, "{}"),
        }
    })
    .await;

    let playlists = get_user_playlists(&http_client(), &server.config(), &bearer("user"))
        .await
        .unwrap();

    let ids: Vec<&str> = playlists
        .items
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(
        playlists.href,
        Some(server.url("/v1/me/playlists?offset=50&limit=50"))
    );
    assert_eq!(playlists.extra["offset"], json!(0));
}
