/// Request shapes for the three user-facing operations and their
/// field-level validation.

use serde::Deserialize;
use uuid::Uuid;

use crate::auth::MAX_PASSWORD_BYTES;
use crate::error::{AuthError, ValidationError};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub refresh_token: String,
}

/// Registration rules, first failure wins:
/// login, password, confirmation, equality, minimum then maximum length.
///
/// Length is counted in bytes; the maximum is bcrypt's input limit.
pub fn validate_registration(
    request: &RegisterRequest,
    password_min_length: usize,
) -> Result<(), ValidationError> {
    if request.login.is_empty() {
        return Err(ValidationError::LoginRequired);
    }
    if request.password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    if request.confirm_password.is_empty() {
        return Err(ValidationError::ConfirmPasswordRequired);
    }
    if request.password != request.confirm_password {
        return Err(ValidationError::PasswordNotEqual);
    }
    if password_min_length > 0 && request.password.len() < password_min_length {
        return Err(ValidationError::PasswordTooShort(password_min_length));
    }
    if request.password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::PasswordTooLong(MAX_PASSWORD_BYTES));
    }
    Ok(())
}

pub fn validate_login(request: &LoginRequest) -> Result<(), ValidationError> {
    if request.login.is_empty() {
        return Err(ValidationError::LoginRequired);
    }
    if request.password.is_empty() {
        return Err(ValidationError::PasswordRequired);
    }
    Ok(())
}

/// Reports every missing field at once and parses the user id.
pub fn validate_refresh(request: &RefreshRequest) -> Result<Uuid, AuthError> {
    let mut errors = Vec::new();

    let id = if request.id.is_empty() {
        errors.push(ValidationError::IdRequired);
        None
    } else {
        match Uuid::parse_str(&request.id) {
            Ok(id) => Some(id),
            Err(_) => {
                errors.push(ValidationError::InvalidId);
                None
            }
        }
    };

    if request.refresh_token.is_empty() {
        errors.push(ValidationError::RefreshTokenRequired);
    }

    match id {
        Some(id) if errors.is_empty() => Ok(id),
        _ => Err(AuthError::Validation(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(login: &str, password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            login: login.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
            name: "Name".to_string(),
            last_name: String::new(),
        }
    }

    #[test]
    fn test_registration_rule_order() {
        let cases = vec![
            (register("", "", ""), Err(ValidationError::LoginRequired)),
            (register("", "password", ""), Err(ValidationError::LoginRequired)),
            (register("login", "", ""), Err(ValidationError::PasswordRequired)),
            (register("login", "", "password"), Err(ValidationError::PasswordRequired)),
            (
                register("login", "password", ""),
                Err(ValidationError::ConfirmPasswordRequired),
            ),
            (
                register("login", "password", "qwerty"),
                Err(ValidationError::PasswordNotEqual),
            ),
            (
                register("login", "short", "short"),
                Err(ValidationError::PasswordTooShort(8)),
            ),
            (register("login", "password", "password"), Ok(())),
        ];

        for (request, expected) in cases {
            assert_eq!(validate_registration(&request, 8), expected, "{:?}", request);
        }
    }

    #[test]
    fn test_mismatch_wins_over_length() {
        // both too short and unequal
        let request = register("login", "a", "b");
        assert_eq!(
            validate_registration(&request, 8),
            Err(ValidationError::PasswordNotEqual)
        );
    }

    #[test]
    fn test_password_over_bcrypt_limit_rejected() {
        let at_limit = "a".repeat(72);
        assert_eq!(
            validate_registration(&register("login", &at_limit, &at_limit), 8),
            Ok(())
        );

        let over = format!("{}X", at_limit);
        assert_eq!(
            validate_registration(&register("login", &over, &over), 8),
            Err(ValidationError::PasswordTooLong(72))
        );
    }

    #[test]
    fn test_zero_min_length_disables_rule() {
        let request = register("login", "a", "a");
        assert_eq!(validate_registration(&request, 0), Ok(()));
    }

    #[test]
    fn test_login_validation() {
        let request = |login: &str, password: &str| LoginRequest {
            login: login.to_string(),
            password: password.to_string(),
        };

        assert_eq!(validate_login(&request("", "")), Err(ValidationError::LoginRequired));
        assert_eq!(
            validate_login(&request("", "password")),
            Err(ValidationError::LoginRequired)
        );
        assert_eq!(
            validate_login(&request("login", "")),
            Err(ValidationError::PasswordRequired)
        );
        assert_eq!(validate_login(&request("login", "password")), Ok(()));
    }

    #[test]
    fn test_refresh_collects_all_errors() {
        let request = RefreshRequest {
            id: String::new(),
            refresh_token: String::new(),
        };

        match validate_refresh(&request) {
            Err(AuthError::Validation(errors)) => assert_eq!(
                errors,
                vec![ValidationError::IdRequired, ValidationError::RefreshTokenRequired]
            ),
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_refresh_rejects_malformed_id() {
        let request = RefreshRequest {
            id: "not-a-uuid".to_string(),
            refresh_token: "token".to_string(),
        };

        match validate_refresh(&request) {
            Err(AuthError::Validation(errors)) => {
                assert_eq!(errors, vec![ValidationError::InvalidId])
            }
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_refresh_parses_id() {
        let id = Uuid::new_v4();
        let request = RefreshRequest {
            id: id.to_string(),
            refresh_token: "token".to_string(),
        };

        assert_eq!(validate_refresh(&request).unwrap(), id);
    }
}
