use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::LoginRequest,
        services::{check_credentials, CredentialError},
    },
    dto::MessageResponse,
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload?;

    match check_credentials(state.users.as_ref(), &payload.email, &payload.password).await {
        Ok(user) => {
            info!(user_id = %user.id, email = %user.email, "login succeeded");
            Ok(Json(MessageResponse::new("Login successful")))
        }
        Err(e @ (CredentialError::UnknownUser | CredentialError::WrongPassword)) => {
            warn!(email = %payload.email.trim(), reason = %e, "login rejected");
            Err(ApiError::Unauthorized(e.to_string()))
        }
        Err(e) => Err(ApiError::internal("Internal error", &e)),
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        app::build_app,
        auth::services::seed_admin,
        config::AdminSeed,
        state::AppState,
    };

    async fn login(state: &AppState, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        let res = build_app(state.clone()).oneshot(req).await.expect("response");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    async fn seeded_state() -> AppState {
        let state = AppState::fake();
        let seed = AdminSeed {
            email: "admin@example.com".into(),
            password: "123456".into(),
        };
        seed_admin(state.users.as_ref(), &seed).await.expect("seed");
        state
    }

    #[tokio::test]
    async fn correct_credentials_succeed_without_issuing_anything() {
        let state = seeded_state().await;
        let (status, body) = login(&state, json!({ "email": "admin@example.com", "password": "123456" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Login successful" }));
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let state = seeded_state().await;
        let (status, body) = login(&state, json!({ "email": "admin@example.com", "password": "654321" })).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Incorrect password");
    }

    #[tokio::test]
    async fn unknown_email_is_unauthorized() {
        let state = seeded_state().await;
        let (status, body) = login(&state, json!({ "email": "ghost@example.com", "password": "123456" })).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "User not found");
    }

    #[tokio::test]
    async fn incomplete_body_is_rejected() {
        let state = seeded_state().await;
        let (status, body) = login(&state, json!({ "email": "admin@example.com" })).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("password"));
    }
}
