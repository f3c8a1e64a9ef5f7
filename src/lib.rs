//! Todo client - session handling, route guards and signature capture
//!
//! This is the library interface for the todo client. The binary is a thin
//! command-line front end over the same types.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod observable;
pub mod routing;
pub mod signature;
pub mod todos;

pub use app::App;
pub use auth::SessionManager;
pub use config::Config;
pub use error::Error;
