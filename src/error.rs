/// Error taxonomy for the credential and token lifecycle.
///
/// Every core operation returns `Result<_, AuthError>`. The HTTP layer turns
/// an `AuthError` into a JSON body and a status code through `ResponseError`.
/// Client-caused failures are logged at `warn`, infrastructure faults at
/// `error`.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// FIELD-LEVEL VALIDATION
// ============================================================================

/// Shape violations in an inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("login required")]
    LoginRequired,
    #[error("password required")]
    PasswordRequired,
    #[error("password required")]
    ConfirmPasswordRequired,
    #[error("password not equal")]
    PasswordNotEqual,
    #[error("password is too short, min length is {0}")]
    PasswordTooShort(usize),
    #[error("password is too long, max length is {0}")]
    PasswordTooLong(usize),
    #[error("id required")]
    IdRequired,
    #[error("id has invalid format")]
    InvalidId,
    #[error("refresh token required")]
    RefreshTokenRequired,
}

impl ValidationError {
    /// Request field the rule applies to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::LoginRequired => "login",
            ValidationError::PasswordRequired
            | ValidationError::PasswordTooShort(_)
            | ValidationError::PasswordTooLong(_) => "password",
            ValidationError::ConfirmPasswordRequired | ValidationError::PasswordNotEqual => {
                "confirm_password"
            }
            ValidationError::IdRequired | ValidationError::InvalidId => "id",
            ValidationError::RefreshTokenRequired => "refresh_token",
        }
    }

    /// Short machine-readable name of the rule that failed.
    pub fn tag(&self) -> &'static str {
        match self {
            ValidationError::LoginRequired
            | ValidationError::PasswordRequired
            | ValidationError::ConfirmPasswordRequired
            | ValidationError::IdRequired
            | ValidationError::RefreshTokenRequired => "required",
            ValidationError::PasswordNotEqual => "eqfield",
            ValidationError::PasswordTooShort(_) => "min",
            ValidationError::PasswordTooLong(_) => "max",
            ValidationError::InvalidId => "uuid",
        }
    }
}

// ============================================================================
// BACKING STORE FAILURES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("duplicate entry: {0}")]
    Conflict(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Database(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // 23505 = unique_violation
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                StoreError::Conflict(db.message().to_string())
            }
            sqlx::Error::RowNotFound => StoreError::NotFound(err.to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Database(err.to_string()),
        }
    }
}

// ============================================================================
// UNIFIED CORE ERROR
// ============================================================================

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", describe(.0))]
    Validation(Vec<ValidationError>),
    #[error("login or password invalid")]
    InvalidCredentials,
    #[error("user already exists")]
    UserAlreadyExists,
    #[error("user not found")]
    NotFound,
    #[error("refresh token expired")]
    RefreshTokenExpired,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("token signing failed: {0}")]
    Token(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// A half-written registration whose rollback also failed.
    #[error("inconsistent state: {cause}; compensating delete failed: {compensation}")]
    InconsistentState {
        cause: Box<AuthError>,
        compensation: StoreError,
    },
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<ValidationError> for AuthError {
    fn from(err: ValidationError) -> Self {
        AuthError::Validation(vec![err])
    }
}

impl AuthError {
    /// Stable error code for client-side handling.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Validation(_) => "VALIDATION_ERROR",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            AuthError::NotFound => "NOT_FOUND",
            AuthError::RefreshTokenExpired => "REFRESH_TOKEN_EXPIRED",
            AuthError::Hashing(_) => "HASHING_ERROR",
            AuthError::Token(_) => "TOKEN_ERROR",
            AuthError::Store(_) => "STORE_ERROR",
            AuthError::InconsistentState { .. } => "INCONSISTENT_STATE",
        }
    }

    /// Whether the failure was caused by the caller rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AuthError::Validation(_)
                | AuthError::InvalidCredentials
                | AuthError::UserAlreadyExists
                | AuthError::NotFound
                | AuthError::RefreshTokenExpired
        )
    }

    pub fn log_error(&self, error_id: &str) {
        match self {
            AuthError::InvalidCredentials => {
                tracing::warn!(error_id = error_id, error = %self, "Invalid credentials attempt");
            }
            AuthError::InconsistentState { cause, compensation } => {
                tracing::error!(
                    error_id = error_id,
                    cause = %cause,
                    compensation = %compensation,
                    "Registration left an orphaned profile record"
                );
            }
            e if e.is_client_error() => {
                tracing::warn!(error_id = error_id, code = e.code(), error = %e, "Request rejected");
            }
            e => {
                tracing::error!(error_id = error_id, code = e.code(), error = %e, "Internal failure");
            }
        }
    }
}

// ============================================================================
// HTTP RESPONSE MAPPING
// ============================================================================

#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub tag: &'static str,
}

impl From<&ValidationError> for FieldError {
    fn from(err: &ValidationError) -> Self {
        Self {
            field: err.field(),
            tag: err.tag(),
        }
    }
}

/// Body of every failed response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error_id: String,
    pub code: &'static str,
    pub cause: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    pub fn from_error(err: &AuthError, error_id: String) -> Self {
        // Infrastructure details stay in the logs.
        let cause = if err.is_client_error() {
            err.to_string()
        } else {
            "internal server error".to_string()
        };
        let errors = match err {
            AuthError::Validation(list) => Some(list.iter().map(FieldError::from).collect()),
            _ => None,
        };

        Self {
            ok: false,
            error_id,
            code: err.code(),
            cause,
            errors,
        }
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials | AuthError::RefreshTokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::UserAlreadyExists => StatusCode::CONFLICT,
            AuthError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Hashing(_)
            | AuthError::Token(_)
            | AuthError::Store(_)
            | AuthError::InconsistentState { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_id = uuid::Uuid::new_v4().to_string();
        self.log_error(&error_id);

        HttpResponse::build(self.status_code()).json(ErrorResponse::from_error(self, error_id))
    }
}
