pub mod auth;
pub mod extract;
pub mod response;

pub use auth::{jwt_auth_middleware, json_method_not_allowed, AuthUser};
pub use extract::{IdPath, Params, Payload};
pub use response::{ApiResponse, ApiResult};
