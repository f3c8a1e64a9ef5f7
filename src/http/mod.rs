//! Authenticated HTTP access to the backend

mod client;

pub use client::{ApiClient, StatusReaction};
