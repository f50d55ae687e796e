//! Account registration and login.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use m4_core::validation::{validate_email, validate_password};
use m4_core::ValidationError;
use m4_db::{hash_password, verify_password, User};

use crate::auth::AuthError;
use crate::error::ApiResult;
use crate::routes::ApiJson;
use crate::AppState;

/// Body of both register and login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub email: Option<String>,
    #[serde(alias = "senha")]
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn into_parts(self) -> Result<(String, String), ValidationError> {
        let email = self.email.ok_or_else(|| ValidationError::required("email"))?;
        let password = self
            .password
            .ok_or_else(|| ValidationError::required("password"))?;
        Ok((email, password))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: i64,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserDto,
}

/// `POST /api/auth/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<CredentialsRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let (email, password) = body.into_parts()?;
    let email = validate_email(&email)?;
    validate_password(&password)?;

    let hash = hash_password(&password)?;
    let user = state.db.users().insert(&email, &hash).await?;

    info!(id = user.id, email = %user.email, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { user: user.into() }),
    ))
}

/// `POST /api/auth/login`
///
/// Unknown email and wrong password produce the same 401.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<CredentialsRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (email, password) = body.into_parts()?;
    let email = email.trim().to_lowercase();

    let user = state
        .db
        .users()
        .find_by_email(&email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !verify_password(&password, &user.password_hash) {
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state.jwt.generate_access_token(user.id, &user.email)?;
    info!(id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: state.jwt.access_lifetime_secs(),
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{app, send, ADMIN_EMAIL, ADMIN_PASSWORD};

    #[tokio::test]
    async fn test_register_then_login() {
        let (app, state) = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            Some(json!({ "email": "Vendas@M4.com", "password": "123456" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["email"], "vendas@m4.com");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": "vendas@m4.com", "senha": "123456" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tokenType"], "Bearer");
        assert_eq!(body["expiresIn"], 86400);

        let token = body["token"].as_str().unwrap();
        let claims = state.jwt.validate_access_token(token).unwrap();
        assert_eq!(claims.email, "vendas@m4.com");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (app, _) = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            Some(json!({ "email": ADMIN_EMAIL, "password": "another-pass" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let (app, _) = app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            Some(json!({ "email": "x@m4.com" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "password is required");

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/auth/register",
            Some(json!({ "email": "x@m4.com", "password": "123" })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let (app, _) = app().await;

        for (email, password) in [(ADMIN_EMAIL, "wrong-pass"), ("nobody@m4.com", ADMIN_PASSWORD)] {
            let (status, body) = send(
                &app,
                Method::POST,
                "/api/auth/login",
                Some(json!({ "email": email, "password": password })),
                None,
            )
            .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["code"], "UNAUTHORIZED");
            assert_eq!(body["message"], "Invalid credentials");
        }
    }
}
