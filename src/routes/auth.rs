/// Authentication Routes
///
/// Thin JSON adapters over `AuthService`. All outcome decisions are made by
/// the service; failures render through `AuthError`'s `ResponseError` impl.

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::error::AuthError;
use crate::service::{AuthService, AuthSuccess, LoginRequest, RefreshRequest, RegisterRequest};
use crate::users::{LoginType, User};

/// Public view of a user
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub login: String,
    pub login_type: LoginType,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<String>,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            login: user.login.clone(),
            login_type: user.login_type,
            name: user.name.clone(),
            last_name: user.last_name.clone(),
            display_name: user.display_name(),
            last_login_at: user.last_login_at.map(|at| at.to_rfc3339()),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub ok: bool,
    pub user: UserResponse,
}

/// Session and refresh token pair
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub ok: bool,
    pub token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Session token lifetime in seconds
    pub expires_in: i64,
    pub user: UserResponse,
}

impl AuthResponse {
    fn new(success: AuthSuccess, token_minutes: i64) -> Self {
        Self {
            ok: true,
            user: UserResponse::from(&success.user),
            token: success.token,
            refresh_token: success.refresh_token,
            token_type: "Bearer",
            expires_in: token_minutes * 60,
        }
    }
}

/// POST /auth/register
///
/// # Errors
/// - 400: missing login/password, password mismatch or too short
/// - 409: login already registered
/// - 500: hashing or store failure, including a failed rollback
pub async fn register(
    form: web::Json<RegisterRequest>,
    service: web::Data<AuthService>,
) -> Result<HttpResponse, AuthError> {
    let user = service.register(&form).await?;

    Ok(HttpResponse::Created().json(RegisterResponse {
        ok: true,
        user: UserResponse::from(&user),
    }))
}

/// POST /auth/login
///
/// # Errors
/// - 400: missing login or password
/// - 401: unknown login or wrong password (indistinguishable)
pub async fn login(
    form: web::Json<LoginRequest>,
    service: web::Data<AuthService>,
) -> Result<HttpResponse, AuthError> {
    let success = service.login(&form).await?;

    Ok(HttpResponse::Ok().json(AuthResponse::new(
        success,
        service.policy().token_expiration_minutes,
    )))
}

/// POST /auth/refresh
///
/// # Errors
/// - 400: missing or malformed id, missing refresh token
/// - 401: refresh token invalid or expired
/// - 404: unknown user id
pub async fn refresh(
    form: web::Json<RefreshRequest>,
    service: web::Data<AuthService>,
) -> Result<HttpResponse, AuthError> {
    let success = service.refresh(&form).await?;

    Ok(HttpResponse::Ok().json(AuthResponse::new(
        success,
        service.policy().token_expiration_minutes,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_user_response_fields() {
        let user = User::new("alice".into(), "Alice".into(), String::new(), Utc::now());
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(json["login"], "alice");
        assert_eq!(json["login_type"], "email");
        assert_eq!(json["display_name"], "Alice");
        assert!(json.get("last_name").is_none());
        assert!(json.get("last_login_at").is_none());
        assert!(json.get("password_hash").is_none());
    }
}
