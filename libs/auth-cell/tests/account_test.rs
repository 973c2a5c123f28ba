use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::mpsc::UnboundedReceiver;
use tower::ServiceExt;

use auth_cell::{auth_routes, verification_routes, AuthState};
use notification_cell::{NotificationDispatcher, NotificationJob};
use shared_database::{DoctorDirectory, InMemoryDoctorDirectory, StoreError};
use shared_models::doctor::{Doctor, NewDoctor};
use shared_utils::jwt::verify_token;
use shared_utils::test_utils::TestConfig;

struct TestApp {
    router: Router,
    doctors: Arc<InMemoryDoctorDirectory>,
    jobs: UnboundedReceiver<NotificationJob>,
    secret: String,
}

fn test_app() -> TestApp {
    let test_config = TestConfig::default();
    let doctors = Arc::new(InMemoryDoctorDirectory::new());
    let (notifications, jobs) = NotificationDispatcher::channel();

    let state = AuthState::new(test_config.to_arc(), doctors.clone(), notifications);
    let router = Router::new()
        .nest("/api/doctor", auth_routes(state.clone()))
        .merge(verification_routes(state));

    TestApp {
        router,
        doctors,
        jobs,
        secret: test_config.jwt_secret,
    }
}

fn signup_payload(username: &str, email: &str) -> Value {
    json!({
        "first_name": "Ayu",
        "last_name": "Lestari",
        "contact_number": "081234567890",
        "gender": "female",
        "email": email,
        "username": username,
        "password": "secret123"
    })
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8_lossy(&bytes).to_string())
}

#[tokio::test]
async fn test_signup_rejects_short_username() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/api/doctor/signup",
        signup_payload("ab", "ayu@example.com"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert_eq!(body["error"], true);
    assert_eq!(
        body["message"],
        "Username must be at least 5 characters and max 100 characters"
    );
    assert!(app.doctors.find_by_username("ab").await.unwrap().is_none());
}

#[tokio::test]
async fn test_signup_then_repeat_conflicts() {
    let mut app = test_app();
    let payload = signup_payload("ayulestari", "ayu@example.com");

    let (status, body) = post_json(&app.router, "/api/doctor/signup", payload.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Doctor account registered successfully");
    assert!(body["id"].is_i64());

    let token = body["token"].as_str().unwrap();
    assert!(!token.is_empty());
    assert_eq!(verify_token(token, &app.secret).unwrap().sub, "ayulestari");

    let stored = app.doctors.find_by_username("ayulestari").await.unwrap().unwrap();
    assert_eq!(stored.full_name, "Ayu Lestari");
    assert!(!stored.is_verified);
    assert_ne!(stored.password_hash, "secret123");

    match app.jobs.try_recv().unwrap() {
        NotificationJob::Verification { email, token, .. } => {
            assert_eq!(email, "ayu@example.com");
            assert_eq!(Some(token), stored.verification_token);
        }
        other => panic!("unexpected job {:?}", other),
    }

    let (status, body) = post_json(&app.router, "/api/doctor/signup", payload).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Username already exists");

    let (status, body) = post_json(
        &app.router,
        "/api/doctor/signup",
        signup_payload("someoneelse", "ayu@example.com"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already exists");
}

#[tokio::test]
async fn test_weak_passwords_insert_nothing() {
    let app = test_app();

    for password in ["short1", "lettersonly", "1234567890"] {
        let mut payload = signup_payload("weakpass", "weak@example.com");
        payload["password"] = json!(password);

        let (status, body) = post_json(&app.router, "/api/doctor/signup", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "password {}", password);
        assert!(body["message"].as_str().unwrap().starts_with("Password must be"));
    }

    assert!(app.doctors.find_by_username("weakpass").await.unwrap().is_none());
}

#[tokio::test]
async fn test_malformed_body() {
    let app = test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/doctor/signup")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Invalid request body");
}

#[tokio::test]
async fn test_verification_unlocks_signin() {
    let mut app = test_app();
    post_json(
        &app.router,
        "/api/doctor/signup",
        signup_payload("ayulestari", "ayu@example.com"),
    )
    .await;
    let _ = app.jobs.try_recv();

    let credentials = json!({"username": "ayulestari", "password": "secret123"});

    let (status, body) = post_json(&app.router, "/api/doctor/signin", credentials.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "Account not verified. Please verify your account before logging in."
    );

    let (status, _) = get(&app.router, "/verify?token=bogus").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = get(&app.router, "/verify").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let verification_token = app
        .doctors
        .find_by_username("ayulestari")
        .await
        .unwrap()
        .and_then(|doctor| doctor.verification_token)
        .unwrap();

    let (status, page) = get(&app.router, &format!("/verify?token={}", verification_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("Account Verified"));

    // the token is single use
    let (status, _) = get(&app.router, &format!("/verify?token={}", verification_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = post_json(&app.router, "/api/doctor/signin", credentials).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Doctor login successful");
    assert_eq!(body["error"], false);
    assert!(!body["token"].as_str().unwrap().is_empty());

    assert!(matches!(
        app.jobs.try_recv(),
        Ok(NotificationJob::LoginAlert { .. })
    ));
}

#[tokio::test]
async fn test_signin_failures() {
    let app = test_app();
    post_json(
        &app.router,
        "/api/doctor/signup",
        signup_payload("ayulestari", "ayu@example.com"),
    )
    .await;

    let cases = [
        (json!({"password": "secret123"}), StatusCode::BAD_REQUEST, "Username is required"),
        (json!({"username": "ayulestari"}), StatusCode::BAD_REQUEST, "Password is required"),
        (
            json!({"username": "nobody", "password": "secret123"}),
            StatusCode::UNAUTHORIZED,
            "Invalid username",
        ),
        (
            json!({"username": "ayulestari", "password": "wrong1234"}),
            StatusCode::UNAUTHORIZED,
            "Invalid password",
        ),
    ];

    for (payload, expected_status, expected_message) in cases {
        let (status, body) = post_json(&app.router, "/api/doctor/signin", payload).await;
        assert_eq!(status, expected_status);
        assert_eq!(body["message"], expected_message);
    }
}

/// Lookups miss but the insert collides, as when a concurrent signup wins
/// between the pre-check and the write.
struct CollidingDirectory;

#[async_trait]
impl DoctorDirectory for CollidingDirectory {
    async fn find_by_id(&self, _id: i64) -> Result<Option<Doctor>, StoreError> {
        Ok(None)
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<Doctor>, StoreError> {
        Ok(None)
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<Doctor>, StoreError> {
        Ok(None)
    }

    async fn find_by_verification_token(&self, _token: &str) -> Result<Option<Doctor>, StoreError> {
        Ok(None)
    }

    async fn insert(&self, _doctor: NewDoctor) -> Result<Doctor, StoreError> {
        Err(StoreError::UniqueViolation("username".to_string()))
    }

    async fn mark_verified(&self, _id: i64) -> Result<Doctor, StoreError> {
        Err(StoreError::NotFound)
    }
}

#[tokio::test]
async fn test_insert_time_collision_is_conflict() {
    let test_config = TestConfig::default();
    let (notifications, mut jobs) = NotificationDispatcher::channel();
    let state = AuthState::new(test_config.to_arc(), Arc::new(CollidingDirectory), notifications);
    let router = Router::new().nest("/api/doctor", auth_routes(state));

    let (status, body) = post_json(
        &router,
        "/api/doctor/signup",
        signup_payload("ayulestari", "ayu@example.com"),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
    assert_eq!(body["message"], "Username already exists");
    assert!(jobs.try_recv().is_err());
}
