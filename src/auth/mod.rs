//! Authentication and session management

pub mod api;
pub mod clock;
pub mod models;
pub mod permissions;
pub mod session;
pub mod store;
pub mod validation;

pub use api::{ApiFailure, ApiResult, AuthApi, HttpAuthApi};
pub use clock::{Clock, ManualClock, SystemClock};
pub use models::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, User, UserRole, UserSession};
pub use permissions::{Permission, Permissions};
pub use session::SessionManager;
pub use store::{FileStore, KeyValueStore, MemoryStore};
