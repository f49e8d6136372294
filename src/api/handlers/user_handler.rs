//! User registration handler.

use std::borrow::Cow;

use axum::{extract::State, routing::post, Router};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::config::{MSG_ROLE_INVALID, MSG_USER_CREATED};
use crate::domain::{NewUser, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::services::UserService;
use crate::types::Created;

/// User registration request.
///
/// Missing and `null` fields deserialize as empty strings so they fail
/// their rule and are reported together with every other violation.
/// Unknown fields are ignored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserRequest {
    /// User display name
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "name should not be empty"))]
    #[schema(example = "Ana")]
    pub name: String,
    /// User email address
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "validate_email_address"))]
    #[schema(example = "ana@test.com")]
    pub email: String,
    /// User password (minimum 6 characters, counted as Unicode scalar values)
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(
        min = 6,
        message = "password must be longer than or equal to 6 characters"
    ))]
    #[schema(example = "123456", min_length = 6)]
    pub password: String,
    /// Account role: CLIENT or SELLER
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "validate_role"))]
    #[schema(example = "CLIENT")]
    pub role: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC-shaped address whose domain ends in an alphabetic top-level label
/// (or an IDN `xn--` label), so `ana@test` and IP literals are rejected.
fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    let has_tld = email
        .rsplit_once('@')
        .and_then(|(_, domain)| domain.rsplit_once('.'))
        .map(|(_, tld)| {
            tld.len() >= 2
                && (tld.chars().all(|c| c.is_alphabetic()) || tld.starts_with("xn--"))
        })
        .unwrap_or(false);

    if email.validate_email() && has_tld {
        return Ok(());
    }

    let mut error = ValidationError::new("email");
    error.message = Some(Cow::Borrowed("email must be an email"));
    Err(error)
}

fn validate_role(role: &str) -> Result<(), ValidationError> {
    match role.parse::<UserRole>() {
        Ok(_) => Ok(()),
        Err(_) => {
            let mut error = ValidationError::new("is_enum");
            error.message = Some(Cow::Borrowed(MSG_ROLE_INVALID));
            Err(error)
        }
    }
}

impl TryFrom<RegisterUserRequest> for NewUser {
    type Error = AppError;

    fn try_from(request: RegisterUserRequest) -> Result<Self, Self::Error> {
        let role = request
            .role
            .parse::<UserRole>()
            .map_err(|_| AppError::validation([MSG_ROLE_INVALID]))?;

        Ok(NewUser {
            name: request.name,
            email: request.email,
            password: request.password,
            role,
        })
    }
}

/// Successful registration body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterUserResponse {
    #[schema(example = "Usuário criado com sucesso")]
    pub message: String,
    pub user: UserResponse,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/register", post(register))
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/users/register",
    tag = "Users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered successfully", body = RegisterUserResponse),
        (status = 400, description = "Validation error or email already registered"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterUserRequest>,
) -> AppResult<Created<RegisterUserResponse>> {
    let user = state.user_service.create_user(payload.try_into()?).await?;

    Ok(Created(RegisterUserResponse {
        message: MSG_USER_CREATED.to_string(),
        user,
    }))
}
