pub mod auth;
pub mod response;

pub use auth::{active_user_middleware, admin_middleware};
pub use response::{ApiResponse, ApiResult};
