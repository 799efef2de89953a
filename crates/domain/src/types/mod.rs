//! Domain types and models

pub mod diagnostic;
pub mod options;
pub mod session;
pub mod user;

pub use diagnostic::Diagnostic;
pub use options::{
    AuthorizationParams, CacheLocation, ClientOptions, LoginOptions, LogoutOptions, LogoutParams,
};
pub use session::{SessionPhase, SessionSnapshot, StorageEvent};
pub use user::UserProfile;
