//! Guard decisions

use tracing::debug;

use super::{GuardKind, Route, RouteDef};
use crate::auth::SessionManager;

/// Where to send the user instead
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    /// Originally requested URL, restored after login
    pub return_url: Option<String>,
}

impl Redirect {
    pub fn to(route: Route) -> Self {
        Self {
            to: route,
            return_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(Redirect),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

/// Allow a valid session whose role satisfies the route; otherwise redirect
pub fn auth_guard(session: &SessionManager, def: &RouteDef, requested_url: &str) -> Decision {
    if session.is_authenticated() {
        if !def.required_roles.is_empty() && !session.has_any_role(def.required_roles) {
            debug!("Insufficient role for {}", requested_url);
            return Decision::Redirect(Redirect::to(Route::Forbidden));
        }
        return Decision::Allow;
    }

    debug!("Not authenticated, redirecting {} to login", requested_url);
    Decision::Redirect(Redirect {
        to: Route::Login,
        return_url: Some(requested_url.to_string()),
    })
}

/// Admins only; everyone else sees the forbidden page
pub fn admin_guard(session: &SessionManager) -> Decision {
    if session.is_admin() {
        Decision::Allow
    } else {
        Decision::Redirect(Redirect::to(Route::Forbidden))
    }
}

/// Keep signed-in users away from the login and register forms
pub fn no_auth_guard(session: &SessionManager) -> Decision {
    if session.is_authenticated() {
        Decision::Redirect(Redirect::to(Route::Todos))
    } else {
        Decision::Allow
    }
}

/// Run the guard declared by `def`
pub fn check(session: &SessionManager, def: &RouteDef, requested_url: &str) -> Decision {
    match def.guard {
        GuardKind::None => Decision::Allow,
        GuardKind::Authenticated => auth_guard(session, def, requested_url),
        GuardKind::Admin => admin_guard(session),
        GuardKind::NoAuth => no_auth_guard(session),
    }
}
