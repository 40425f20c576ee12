// handlers/protected/mod.rs - Protected handlers (active user required)
//
// Middleware: active_user_middleware

pub mod users;

pub use users::users_me;
