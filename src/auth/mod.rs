//! Authentication and session lifecycle

pub mod middleware;
pub mod models;
pub mod password;
pub mod session;
pub mod tokens;

pub use middleware::{extract_access_token, extract_cookie, require_auth, CurrentUser};
pub use models::{
    AuthenticatedSession, LoginIdentifier, NewUser, TokenPair, UserAccount, UserProfile,
};
pub use password::{hash_password, verify_password};
pub use session::{SessionError, SessionManager};
pub use tokens::{Claims, TokenIssuer};
