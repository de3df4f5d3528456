mod common;

use std::sync::Arc;

use assert_matches::assert_matches;

use kitchenry_client::api::{ApiClient, LOGIN_PATH};
use kitchenry_client::auth::{AuthContext, AuthState};
use kitchenry_client::error::ClientError;
use kitchenry_client::store::{MemoryStore, SessionStore};

use common::{sign_in, start, user, RecordingNavigator, GOOD_TOKEN, PASSWORD};

#[tokio::test]
async fn starts_in_loading() {
    let h = start().await;
    let auth = AuthContext::new(h.client);
    assert_eq!(auth.state(), &AuthState::Loading);
}

#[tokio::test]
async fn cached_session_paints_then_revalidates() {
    let h = start().await;
    sign_in(&h.store, GOOD_TOKEN, &user("Old Name"));
    let mut auth = AuthContext::new(h.client);

    assert_eq!(auth.restore_cached(), &AuthState::Authenticated(user("Old Name")));
    assert_eq!(h.backend.me_calls(), 0);

    assert_eq!(auth.revalidate().await, &AuthState::Authenticated(user("Ada")));
    assert_eq!(h.backend.me_calls(), 1);
    assert_eq!(h.store.cached_user().unwrap(), Some(user("Ada")));
}

#[tokio::test]
async fn rejected_token_falls_back_to_unauthenticated() {
    let h = start().await;
    sign_in(&h.store, "stale-token", &user("Ada"));
    let mut auth = AuthContext::new(h.client);

    assert_eq!(auth.start().await, &AuthState::Unauthenticated);
    assert_eq!(h.store.token().unwrap(), None);
    assert_eq!(h.store.cached_user().unwrap(), None);
    assert_eq!(h.navigator.paths(), [LOGIN_PATH]);
}

#[tokio::test]
async fn no_token_skips_the_server() {
    let h = start().await;
    let mut auth = AuthContext::new(h.client);

    assert_eq!(auth.start().await, &AuthState::Unauthenticated);
    assert_eq!(h.backend.me_calls(), 0);
    assert!(h.navigator.paths().is_empty());
}

#[tokio::test]
async fn unreachable_server_keeps_the_cached_session() {
    let store = Arc::new(MemoryStore::new());
    sign_in(&store, GOOD_TOKEN, &user("Ada"));
    let client = ApiClient::with_client(
        reqwest::Client::new(),
        "http://127.0.0.1:9",
        store.clone(),
        Arc::new(RecordingNavigator::default()),
    );
    let mut auth = AuthContext::new(client);

    assert_eq!(
        auth.start().await,
        &AuthState::Authenticated(user("Ada"))
    );
    assert_eq!(store.token().unwrap().as_deref(), Some(GOOD_TOKEN));
}

#[tokio::test]
async fn login_stores_the_session() {
    let h = start().await;
    let mut auth = AuthContext::new(h.client);
    auth.start().await;

    let signed_in = auth.login("ada@example.com", PASSWORD).await.unwrap();

    assert_eq!(signed_in.name, "Ada");
    assert!(auth.state().is_authenticated());
    assert_eq!(h.store.token().unwrap().as_deref(), Some(GOOD_TOKEN));
    assert_eq!(h.store.cached_user().unwrap(), Some(signed_in));

    // The stored token now authorizes further calls.
    assert_eq!(auth.client().me().await.unwrap().name, "Ada");
}

#[tokio::test]
async fn failed_login_stays_unauthenticated() {
    let h = start().await;
    let mut auth = AuthContext::new(h.client);
    auth.start().await;

    let err = auth.login("ada@example.com", "wrong password").await.unwrap_err();

    assert_matches!(err, ClientError::Unauthorized(ref message) if message == "Invalid email or password");
    assert_eq!(auth.state(), &AuthState::Unauthenticated);
    assert_eq!(h.store.token().unwrap(), None);
}

#[tokio::test]
async fn logout_forgets_credentials() {
    let h = start().await;
    let mut auth = AuthContext::new(h.client);
    auth.login("ada@example.com", PASSWORD).await.unwrap();

    auth.logout();

    assert_eq!(auth.state(), &AuthState::Unauthenticated);
    assert_eq!(auth.state().user(), None);
    assert_eq!(h.store.token().unwrap(), None);
}
