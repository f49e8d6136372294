//! User registration service
//!
//! An HTTP service that registers client and seller accounts: it validates
//! the submitted payload, rejects emails that are already registered,
//! hashes the password, stores the account, and answers with the public
//! projection of the created user.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Users, roles, and password hashing
//! - **services**: The user-creation workflow
//! - **infra**: Database connection, migrations, and the user store
//! - **api**: HTTP handlers, extractors, and routes
//! - **types**: Shared response types
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Password, User, UserResponse, UserRole};
pub use errors::{AppError, AppResult};
