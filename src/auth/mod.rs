//! Authentication: password hashing, signed tokens, the user store and the
//! request guard built on top of them.

pub mod guard;
pub mod password;
pub mod service;
pub mod token;
pub mod user;
pub mod user_store;

// Re-export main components
pub use guard::{with_auth, AuthContext, AuthGuard, GuardState};
pub use password::PasswordHasher;
pub use service::{AuthService, AuthSession};
pub use token::{token_fingerprint, Claims, TokenPayload, TokenScope, TokenService};
pub use user::{IssuedToken, NewUser, User, UserId, UserProfile};
pub use user_store::UserStore;
