//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::OpenApi;

use crate::api::handlers::user_handler;
use crate::domain::{UserResponse, UserRole};

/// OpenAPI documentation for the registration API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User Registration API",
        version = "0.1.0",
        description = "Account registration for clients and sellers",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(user_handler::register),
    components(
        schemas(
            UserRole,
            UserResponse,
            user_handler::RegisterUserRequest,
            user_handler::RegisterUserResponse,
        )
    ),
    tags(
        (name = "Users", description = "User registration")
    )
)]
pub struct ApiDoc;
