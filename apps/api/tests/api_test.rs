use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use clinic_api::router::create_router;
use clinic_api::state::AppServices;
use notification_cell::NotificationDispatcher;
use shared_database::{DoctorDirectory, InMemoryDoctorDirectory, InMemoryRecordStore};
use shared_utils::test_utils::TestConfig;

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn json_request(method: &str, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("Authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn test_landing_page() {
    let services = AppServices::new(
        TestConfig::default().to_arc(),
        Arc::new(InMemoryDoctorDirectory::new()),
        Arc::new(InMemoryRecordStore::new()),
        NotificationDispatcher::disabled(),
    );
    let router = create_router(&services);

    let (status, body) = send(&router, Request::builder().uri("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("Prodia Clinic API"));
}

#[tokio::test]
async fn test_doctor_journey() {
    let doctors = Arc::new(InMemoryDoctorDirectory::new());
    let services = AppServices::new(
        TestConfig::default().to_arc(),
        doctors.clone(),
        Arc::new(InMemoryRecordStore::new()),
        NotificationDispatcher::disabled(),
    );
    let router = create_router(&services);

    let (status, _) = send(
        &router,
        json_request(
            "POST",
            "/api/doctor/signup",
            None,
            json!({
                "first_name": "Ayu",
                "last_name": "Lestari",
                "contact_number": "081234567890",
                "gender": "female",
                "email": "ayu@example.com",
                "username": "ayulestari",
                "password": "secret123"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let verification_token = doctors
        .find_by_username("ayulestari")
        .await
        .unwrap()
        .and_then(|doctor| doctor.verification_token)
        .unwrap();
    let (status, _) = send(
        &router,
        Request::builder()
            .uri(format!("/verify?token={}", verification_token))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &router,
        json_request(
            "POST",
            "/api/doctor/signin",
            None,
            json!({"username": "ayulestari", "password": "secret123"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    let bearer = format!("Bearer {}", body["token"].as_str().unwrap());

    let (status, _) = send(
        &router,
        json_request(
            "POST",
            "/api/doctor/medical-record",
            Some(&bearer),
            json!({
                "patient_name": "Siti Aminah",
                "birth_date": "1990-05-17",
                "email": "siti@example.com",
                "phone_number": "081234567890",
                "diagnosis": "Hypertension",
                "prescription": "Amlodipine 5mg",
                "care_suggestion": "Reduce salt"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &router,
        Request::builder()
            .uri("/api/doctor/medical-record")
            .header("Authorization", &bearer)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["totalRecords"], 1);
    assert_eq!(body["data"][0]["patient_name"], "Siti Aminah");
}
