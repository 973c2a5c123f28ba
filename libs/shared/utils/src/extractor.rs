use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequest, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error};

use shared_database::DoctorDirectory;
use shared_models::auth::AuthError;
use shared_models::doctor::Doctor;
use shared_models::error::AppError;

use crate::jwt::verify_token;

/// Resolves a bearer token to the doctor it was issued for.
#[derive(Clone)]
pub struct AuthGate {
    jwt_secret: Arc<str>,
    doctors: Arc<dyn DoctorDirectory>,
}

impl AuthGate {
    pub fn new(jwt_secret: &str, doctors: Arc<dyn DoctorDirectory>) -> Self {
        Self {
            jwt_secret: Arc::from(jwt_secret),
            doctors,
        }
    }

    /// Checks the raw `Authorization` header value and loads the subject.
    /// Verification status is not checked here; see [`require_verified`].
    pub async fn authorize(&self, header: Option<&str>) -> Result<Doctor, AuthError> {
        let header = header.map(str::trim).filter(|value| !value.is_empty());
        let header = header.ok_or(AuthError::MissingHeader)?;

        let token = match header.split_once(' ') {
            Some(("Bearer", token)) if !token.is_empty() && !token.contains(' ') => token,
            _ => return Err(AuthError::MalformedHeader),
        };

        let claims = verify_token(token, &self.jwt_secret).map_err(|e| {
            debug!("Bearer token rejected: {}", e);
            AuthError::InvalidToken
        })?;

        match self.doctors.find_by_username(&claims.sub).await {
            Ok(Some(doctor)) => Ok(doctor),
            Ok(None) => Err(AuthError::UnknownSubject),
            Err(e) => {
                error!("Failed to load doctor {}: {}", claims.sub, e);
                Err(AuthError::Lookup(e.to_string()))
            }
        }
    }

    pub async fn authorize_headers(&self, headers: &HeaderMap) -> Result<Doctor, AuthError> {
        let header = match headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedHeader)?),
            None => None,
        };
        self.authorize(header).await
    }
}

pub fn require_verified(doctor: Doctor) -> Result<Doctor, AuthError> {
    if doctor.is_verified {
        Ok(doctor)
    } else {
        Err(AuthError::Unverified)
    }
}

/// The authenticated, verified doctor making the request.
#[derive(Debug, Clone)]
pub struct CurrentDoctor(pub Doctor);

impl<S> FromRequestParts<S> for CurrentDoctor
where
    AuthGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let gate = AuthGate::from_ref(state);
        let doctor = gate.authorize_headers(&parts.headers).await?;
        let doctor = require_verified(doctor)?;

        debug!("Authorized doctor {}", doctor.id);
        Ok(CurrentDoctor(doctor))
    }
}

/// `Json` whose rejection renders as the standard error envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

impl<T: Serialize> IntoResponse for ApiJson<T> {
    fn into_response(self) -> Response {
        Json(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use shared_database::InMemoryDoctorDirectory;
    use tower::ServiceExt;

    use crate::jwt::issue_token;
    use crate::test_utils::TestDoctor;

    const SECRET: &str = "gate-secret";

    async fn gate_with(doctor: TestDoctor) -> (AuthGate, Doctor) {
        let directory = Arc::new(InMemoryDoctorDirectory::new());
        let doctor = doctor.insert_into(directory.as_ref()).await;
        (AuthGate::new(SECRET, directory), doctor)
    }

    #[tokio::test]
    async fn test_authorize_round_trips_issued_token() {
        let (gate, doctor) = gate_with(TestDoctor::verified("drhouse")).await;
        let token = issue_token("drhouse", SECRET).unwrap();

        let resolved = gate.authorize(Some(&format!("Bearer {}", token))).await.unwrap();
        assert_eq!(resolved.id, doctor.id);
    }

    #[tokio::test]
    async fn test_authorize_failure_cases() {
        let (gate, _) = gate_with(TestDoctor::verified("drhouse")).await;
        let token = issue_token("drhouse", SECRET).unwrap();
        let stranger = issue_token("nobody", SECRET).unwrap();

        assert_eq!(gate.authorize(None).await, Err(AuthError::MissingHeader));
        assert_eq!(gate.authorize(Some("  ")).await, Err(AuthError::MissingHeader));
        assert_eq!(gate.authorize(Some(&token)).await, Err(AuthError::MalformedHeader));
        assert_eq!(
            gate.authorize(Some(&format!("Basic {}", token))).await,
            Err(AuthError::MalformedHeader)
        );
        assert_eq!(gate.authorize(Some("Bearer abc.def.ghi")).await, Err(AuthError::InvalidToken));
        assert_eq!(
            gate.authorize(Some(&format!("Bearer {}", stranger))).await,
            Err(AuthError::UnknownSubject)
        );
    }

    #[tokio::test]
    async fn test_require_verified() {
        let (_, doctor) = gate_with(TestDoctor::unverified("drgrey")).await;
        assert_matches!(require_verified(doctor), Err(AuthError::Unverified));
    }

    #[derive(Clone)]
    struct GateState {
        gate: AuthGate,
    }

    impl FromRef<GateState> for AuthGate {
        fn from_ref(state: &GateState) -> Self {
            state.gate.clone()
        }
    }

    async fn whoami(CurrentDoctor(doctor): CurrentDoctor) -> String {
        doctor.username
    }

    #[tokio::test]
    async fn test_extractor_rejects_unverified_with_envelope() {
        let directory = Arc::new(InMemoryDoctorDirectory::new());
        TestDoctor::unverified("drgrey").insert_into(directory.as_ref()).await;
        TestDoctor::verified("drhouse").insert_into(directory.as_ref()).await;

        let app = Router::new()
            .route("/whoami", get(whoami))
            .with_state(GateState {
                gate: AuthGate::new(SECRET, directory),
            });

        let unverified = issue_token("drgrey", SECRET).unwrap();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("Authorization", format!("Bearer {}", unverified))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let verified = issue_token("drhouse", SECRET).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("Authorization", format!("Bearer {}", verified))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
