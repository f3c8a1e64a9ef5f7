//! Current location and guarded navigation

use std::sync::Arc;
use tracing::{debug, warn};

use super::guard::{self, Decision};
use super::Route;
use crate::auth::SessionManager;
use crate::observable::Subject;

const MAX_REDIRECTS: usize = 4;

/// Where the user currently is
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub route: Route,
    pub url: String,
    /// Destination to resume after login
    pub return_url: Option<String>,
}

impl Location {
    fn at(route: Route) -> Self {
        Self {
            route,
            url: route.path().to_string(),
            return_url: None,
        }
    }
}

/// Resolves requested URLs through the route table and guards
pub struct Navigator {
    session: Arc<SessionManager>,
    location: Subject<Location>,
}

impl Navigator {
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self {
            session,
            location: Subject::new(Location::at(Route::Login)),
        }
    }

    pub fn location(&self) -> Location {
        self.location.get()
    }

    pub fn location_changes(&self) -> &Subject<Location> {
        &self.location
    }

    /// Navigate to `url`, following guard redirects, and publish the result
    pub fn navigate(&self, url: &str) -> Location {
        let resolved = self.resolve(url);
        debug!("Navigated to {}", resolved.url);
        self.location.publish(resolved.clone());
        resolved
    }

    /// Decide where `url` leads without moving
    pub fn resolve(&self, url: &str) -> Location {
        let mut target = url.to_string();
        let mut return_url = None;

        for _ in 0..=MAX_REDIRECTS {
            let Some(route) = Route::from_path(&target) else {
                target = Route::Login.path().to_string();
                continue;
            };

            match guard::check(&self.session, route.definition(), &target) {
                Decision::Allow => {
                    return Location {
                        route,
                        url: target,
                        return_url,
                    };
                }
                Decision::Redirect(redirect) => {
                    if redirect.return_url.is_some() {
                        return_url = redirect.return_url;
                    }
                    target = redirect.to.path().to_string();
                }
            }
        }

        warn!("Too many redirects resolving {}", url);
        Location::at(Route::Forbidden)
    }

    /// Where to go once login succeeds
    pub fn post_login_destination(&self) -> String {
        self.location()
            .return_url
            .unwrap_or_else(|| Route::Todos.path().to_string())
    }
}
