pub mod auth;
pub mod permission;
pub mod response;

pub use auth::{extract_bearer_token, jwt_auth_middleware, AuthUser};
pub use permission::{guarded, require_permission};
pub use response::{ApiResponse, ApiResult};
