//! Middleware for HTTP request processing:
//! session authentication, the failure envelope and request ids.

pub mod auth;
pub mod error;
pub mod request_id;

pub use auth::{Claims, CurrentUser, JwtService};
pub use error::{AppError, ErrorResponse};
pub use request_id::RequestUuid;
