//! Todo list collaborator

mod models;
mod pagination;
mod service;

pub use models::{Page, Todo, UserSummary, DESCRIPTION_MAX, TITLE_MAX};
pub use pagination::{Pager, MAX_PAGES_SHOWN};
pub use service::*;
