//! Client-side routes and pre-navigation guards

pub mod guard;
mod navigator;

pub use guard::{admin_guard, auth_guard, no_auth_guard, Decision, Redirect};
pub use navigator::{Location, Navigator};

use crate::auth::UserRole;
use std::fmt;

/// Views of the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    Todos,
    Admin,
    Forbidden,
}

/// Which guard protects a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardKind {
    /// Open to everyone
    None,
    /// Requires a valid session
    Authenticated,
    /// Requires the ADMIN role
    Admin,
    /// Only reachable while signed out
    NoAuth,
}

/// Route table entry
#[derive(Debug, Clone, Copy)]
pub struct RouteDef {
    pub route: Route,
    pub guard: GuardKind,
    pub required_roles: &'static [UserRole],
}

const ROUTES: [RouteDef; 5] = [
    RouteDef {
        route: Route::Login,
        guard: GuardKind::NoAuth,
        required_roles: &[],
    },
    RouteDef {
        route: Route::Register,
        guard: GuardKind::NoAuth,
        required_roles: &[],
    },
    RouteDef {
        route: Route::Todos,
        guard: GuardKind::Authenticated,
        required_roles: &[],
    },
    RouteDef {
        route: Route::Admin,
        guard: GuardKind::Admin,
        required_roles: &[UserRole::Admin],
    },
    RouteDef {
        route: Route::Forbidden,
        guard: GuardKind::None,
        required_roles: &[],
    },
];

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Todos => "/todos",
            Route::Admin => "/admin",
            Route::Forbidden => "/forbidden",
        }
    }

    /// Match a URL (query string ignored) against the route table
    pub fn from_path(url: &str) -> Option<Route> {
        let path = url.split(['?', '#']).next().unwrap_or("");
        let path = path.trim_end_matches('/');
        ROUTES
            .iter()
            .map(|def| def.route)
            .find(|route| route.path() == path)
    }

    pub fn definition(&self) -> &'static RouteDef {
        // Every variant has exactly one entry in ROUTES
        ROUTES
            .iter()
            .find(|def| def.route == *self)
            .unwrap_or(&ROUTES[0])
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}
