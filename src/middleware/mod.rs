// ABOUTME: HTTP middleware for admin authentication and cross-origin access
// ABOUTME: Bearer-token guard for /admin routes and the CORS layer built from configuration

pub mod auth;
pub mod cors;

// Authentication middleware
pub use auth::{admin_auth_middleware, AdminAuth, AdminClaims, AdminPrincipal};

// CORS configuration
pub use cors::setup_cors;
