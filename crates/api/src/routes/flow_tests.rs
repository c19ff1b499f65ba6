//! End-to-end tests through the full router
//!
//! Tests cover:
//! - Login (success, wrong password, unknown email, validation)
//! - Protected routes without, with forged, and with expired tokens
//! - Ownership checks on post and user mutation
//! - Public reads and id parsing

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use inkpost_shared::{MemoryStore, PostId, User, UserId};
use serde_json::{json, Value};
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;

use crate::{
    auth::{password::tests::test_auth_config, TokenValidator},
    config::Config,
    create_router,
    state::AppState,
};

const PASSWORD: &str = "password";

struct TestApp {
    state: AppState,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let config = Config {
            bind_address: "127.0.0.1:0".to_string(),
            auth: test_auth_config(),
            seed_demo_data: false,
        };
        let state = AppState::new(config, MemoryStore::new()).unwrap();
        let router = create_router(state.clone());
        Self { state, router }
    }

    async fn add_user(&self, nickname: &str, email: &str) -> User {
        let hash = self.state.verifier.hash(PASSWORD).unwrap();
        self.state
            .store
            .create_user(nickname, email, hash)
            .await
            .unwrap()
    }

    async fn add_post(&self, title: &str, author: UserId) -> PostId {
        self.state
            .store
            .create_post(title, "Hello world", author)
            .await
            .unwrap()
            .id
    }

    fn token_for(&self, user_id: UserId) -> String {
        self.state.issuer.issue(user_id).unwrap()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        split(response).await
    }
}

async fn split(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn unauthorized() -> Value {
    json!({ "error": "Unauthorized" })
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_issues_token_for_subject() {
    let app = TestApp::new().await;
    let user = app.add_user("Pet", "pet@gmail.com").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "Pet@Gmail.com ", "password": PASSWORD })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 3600);

    let token = body["token"].as_str().unwrap();
    let validator = TokenValidator::new(&test_auth_config());
    assert_eq!(validator.validate(token).unwrap(), user.id);
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let app = TestApp::new().await;
    app.add_user("Pet", "pet@gmail.com").await;

    let wrong_password = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "pet@gmail.com", "password": "wrong" })),
        )
        .await;
    let unknown_email = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "nobody@gmail.com", "password": PASSWORD })),
        )
        .await;

    assert_eq!(wrong_password, (StatusCode::UNAUTHORIZED, unauthorized()));
    assert_eq!(unknown_email, wrong_password);
}

#[tokio::test]
async fn test_login_validation() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "pet@gmail.com", "password": "" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Required Password");

    let (status, body) = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "petgmail.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Invalid Email");
}

// =============================================================================
// Authentication on protected routes
// =============================================================================

#[tokio::test]
async fn test_delete_without_header_never_runs() {
    let app = TestApp::new().await;
    let owner = app.add_user("Pet", "pet@gmail.com").await;
    let post_id = app.add_post("Title 1", owner.id).await;

    let (status, body) = app
        .send(Method::DELETE, &format!("/posts/{}", post_id), None, None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized());
    assert!(app.state.store.find_post(post_id).await.is_some());
}

#[tokio::test]
async fn test_bad_tokens_rejected_before_handler() {
    let app = TestApp::new().await;
    let owner = app.add_user("Pet", "pet@gmail.com").await;
    let post_id = app.add_post("Title 1", owner.id).await;

    let expired = app
        .state
        .issuer
        .issue_at(owner.id, OffsetDateTime::now_utc() - Duration::minutes(61))
        .unwrap();

    // A fresh token from the same issuer gets through the same route.
    let valid = app.token_for(owner.id);
    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/posts/{}", post_id),
            Some(&valid),
            Some(json!({ "title": "Still mine", "content": "Hello world" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Still mine");

    let mut forged = valid.clone().into_bytes();
    let last = forged.len() - 2;
    forged[last] = if forged[last] == b'A' { b'B' } else { b'A' };
    let forged = String::from_utf8(forged).unwrap();

    for token in ["This is incorrect token", expired.as_str(), forged.as_str()] {
        let (status, body) = app
            .send(
                Method::DELETE,
                &format!("/posts/{}", post_id),
                Some(token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, unauthorized());
    }

    assert!(app.state.store.find_post(post_id).await.is_some());
}

#[tokio::test]
async fn test_reads_are_public() {
    let app = TestApp::new().await;
    let owner = app.add_user("Pet", "pet@gmail.com").await;
    let post_id = app.add_post("Title 1", owner.id).await;

    let (status, body) = app.send(Method::GET, "/posts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = app
        .send(Method::GET, &format!("/posts/{}", post_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["author_id"], owner.id.0);

    let (status, body) = app
        .send(Method::GET, &format!("/users/{}", owner.id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nickname"], "Pet");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_bad_and_missing_ids() {
    let app = TestApp::new().await;

    let (status, _) = app.send(Method::GET, "/posts/unknown", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.send(Method::GET, "/posts/42", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Post not found");

    let (status, _) = app.send(Method::GET, "/users/unknow", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Ownership
// =============================================================================

#[tokio::test]
async fn test_non_owner_cannot_delete_post() {
    let app = TestApp::new().await;
    let user1 = app.add_user("Funskie", "tusty9292@gmail.com").await;
    let user2 = app.add_user("Wuskie", "chiii57@gmail.com").await;
    let post_id = app.add_post("Title 2", user2.id).await;
    let before = app.state.store.find_post(post_id).await.unwrap();

    let (status, body) = app
        .send(
            Method::DELETE,
            &format!("/posts/{}", post_id),
            Some(&app.token_for(user1.id)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, unauthorized());

    let after = app.state.store.find_post(post_id).await.unwrap();
    assert_eq!(after.title, before.title);
    assert_eq!(after.author_id, user2.id);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/posts/{}", post_id),
            Some(&app.token_for(user2.id)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.state.store.find_post(post_id).await.is_none());
}

#[tokio::test]
async fn test_create_post_uses_token_subject() {
    let app = TestApp::new().await;
    let user1 = app.add_user("Funskie", "tusty9292@gmail.com").await;
    let user2 = app.add_user("Wuskie", "chiii57@gmail.com").await;
    let token = app.token_for(user1.id);

    let (status, body) = app
        .send(
            Method::POST,
            "/posts",
            Some(&token),
            Some(json!({ "title": "Forged", "content": "x", "author_id": user2.id })),
        )
        .await;
    assert_eq!((status, body), (StatusCode::UNAUTHORIZED, unauthorized()));

    let (status, body) = app
        .send(
            Method::POST,
            "/posts",
            Some(&token),
            Some(json!({ "title": "Test create title", "content": "Test create content" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["author_id"], user1.id.0);
    assert_eq!(body["title"], "Test create title");

    let (status, body) = app
        .send(
            Method::POST,
            "/posts",
            Some(&token),
            Some(json!({ "title": "Test create title", "content": "again" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Title Already Taken");

    let (status, body) = app
        .send(
            Method::POST,
            "/posts",
            Some(&token),
            Some(json!({ "title": "", "content": "x" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "Required Title");
}

#[tokio::test]
async fn test_update_post_checks_stored_author() {
    let app = TestApp::new().await;
    let user1 = app.add_user("Funskie", "tusty9292@gmail.com").await;
    let user2 = app.add_user("Wuskie", "chiii57@gmail.com").await;
    let post_id = app.add_post("Title 2", user2.id).await;
    let uri = format!("/posts/{}", post_id);

    // Claiming ownership in the body does not help the non-owner.
    let (status, _) = app
        .send(
            Method::PUT,
            &uri,
            Some(&app.token_for(user1.id)),
            Some(json!({ "title": "Hijacked", "content": "x", "author_id": user1.id })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.state.store.find_post(post_id).await.unwrap().title, "Title 2");

    // Nor can the owner hand the post to someone else.
    let owner_token = app.token_for(user2.id);
    let (status, _) = app
        .send(
            Method::PUT,
            &uri,
            Some(&owner_token),
            Some(json!({ "title": "Gift", "content": "x", "author_id": user1.id })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::PUT,
            &uri,
            Some(&owner_token),
            Some(json!({ "title": "Updated title", "content": "Updated content" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Updated title");
    assert_eq!(body["author_id"], user2.id.0);
}

#[tokio::test]
async fn test_user_can_only_change_themselves() {
    let app = TestApp::new().await;
    let user1 = app.add_user("Funskie", "tusty9292@gmail.com").await;
    let user2 = app.add_user("Wuskie", "chiii57@gmail.com").await;
    let token = app.token_for(user1.id);
    let update = json!({ "nickname": "Chi", "email": "chi57@gmail.com", "password": "new-password" });

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/users/{}", user2.id),
            Some(&token),
            Some(update.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::DELETE, &format!("/users/{}", user2.id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.state.store.find_user(user2.id).await.is_some());

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/users/{}", user1.id),
            Some(&token),
            Some(update),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nickname"], "Chi");

    // The credential record was replaced: the old password no longer works.
    let (status, _) = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "chi57@gmail.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "chi57@gmail.com", "password": "new-password" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_then_login_then_delete_self() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/users",
            None,
            Some(json!({ "nickname": "Pet", "email": "pet@gmail.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
    let user_id = UserId(body["id"].as_u64().unwrap());

    let (status, body) = app
        .send(
            Method::POST,
            "/users",
            None,
            Some(json!({ "nickname": "Frank", "email": "pet@gmail.com", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email Already Taken");

    let (_, body) = app
        .send(
            Method::POST,
            "/login",
            None,
            Some(json!({ "email": "pet@gmail.com", "password": PASSWORD })),
        )
        .await;
    let token = body["token"].as_str().unwrap().to_string();
    app.add_post("Mine", user_id).await;

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/users/{}", user_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(app.state.store.find_user(user_id).await.is_none());
    assert!(app.state.store.list_posts().await.is_empty());
}
