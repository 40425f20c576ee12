pub mod credentials;
pub mod error;
pub mod guard;
pub mod password;
pub mod token;

pub use credentials::{Credential, CredentialStore, MemoryCredentialStore, Role};
pub use error::AuthError;
pub use guard::{authenticate, require_active, require_admin, resolve_current_user, AuthenticatedUser};
pub use password::PasswordHasher;
pub use token::{Claims, TokenService};
