//! Route guard and navigation tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use todo_client::auth::store::{EXPIRY_KEY, TOKEN_KEY, USER_KEY};
use todo_client::auth::{
    ApiFailure, ApiResult, AuthApi, AuthResponse, KeyValueStore, LoginRequest, ManualClock,
    MemoryStore, RefreshRequest, RegisterRequest, SessionManager, User, UserRole,
};
use todo_client::routing::{
    admin_guard, auth_guard, no_auth_guard, Decision, Navigator, Redirect, Route,
};

const START: i64 = 1_700_000_000_000;

/// Counts calls; always logs in as a plain user
#[derive(Default)]
struct CountingApi {
    calls: AtomicUsize,
}

#[async_trait]
impl AuthApi for CountingApi {
    async fn register(&self, _request: &RegisterRequest) -> ApiResult<AuthResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ApiFailure::new(409, None))
    }

    async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(AuthResponse {
            token: "jwt".to_string(),
            token_type: "Bearer".to_string(),
            username: request.username.clone(),
            email: format!("{}@example.com", request.username),
            role: UserRole::User,
            expires_in: 3600,
        })
    }

    async fn refresh(&self, _request: &RefreshRequest) -> ApiResult<AuthResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ApiFailure::new(401, None))
    }
}

struct Fixture {
    api: Arc<CountingApi>,
    clock: Arc<ManualClock>,
    session: Arc<SessionManager>,
    navigator: Navigator,
}

/// Build a session, optionally restored as `role` from storage
fn fixture(role: Option<UserRole>) -> Fixture {
    let store = Arc::new(MemoryStore::new());
    if let Some(role) = role {
        let user = User::new("alice", "alice@example.com", role);
        store.set(TOKEN_KEY, "jwt").unwrap();
        store.set(USER_KEY, &serde_json::to_string(&user).unwrap()).unwrap();
        store.set(EXPIRY_KEY, &(START + 3_600_000).to_string()).unwrap();
    }

    let api = Arc::new(CountingApi::default());
    let clock = Arc::new(ManualClock::new(START));
    let session = Arc::new(SessionManager::with_clock(api.clone(), store, clock.clone()));
    let navigator = Navigator::new(Arc::clone(&session));
    Fixture {
        api,
        clock,
        session,
        navigator,
    }
}

#[test]
fn test_signed_in_user_is_kept_away_from_login() {
    let f = fixture(Some(UserRole::User));

    assert_eq!(
        no_auth_guard(&f.session),
        Decision::Redirect(Redirect::to(Route::Todos))
    );
    let location = f.navigator.navigate("/login");
    assert_eq!(location.route, Route::Todos);
    assert_eq!(f.navigator.navigate("/register").route, Route::Todos);
    assert_eq!(f.api.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_signed_out_user_may_open_login() {
    let f = fixture(None);
    assert!(no_auth_guard(&f.session).is_allowed());
    assert_eq!(f.navigator.navigate("/register").route, Route::Register);
}

#[test]
fn test_todos_requires_session_and_remembers_destination() {
    let f = fixture(None);

    let decision = auth_guard(&f.session, Route::Todos.definition(), "/todos?page=2");
    assert_eq!(
        decision,
        Decision::Redirect(Redirect {
            to: Route::Login,
            return_url: Some("/todos?page=2".to_string()),
        })
    );

    let location = f.navigator.navigate("/todos?page=2");
    assert_eq!(location.route, Route::Login);
    assert_eq!(location.return_url.as_deref(), Some("/todos?page=2"));
    assert_eq!(f.navigator.post_login_destination(), "/todos?page=2");
}

#[test]
fn test_expired_session_is_sent_to_login() {
    let f = fixture(Some(UserRole::User));
    assert_eq!(f.navigator.navigate("/todos").route, Route::Todos);

    f.clock.advance(chrono::Duration::hours(2));
    let location = f.navigator.navigate("/todos");
    assert_eq!(location.route, Route::Login);
    assert_eq!(location.return_url.as_deref(), Some("/todos"));
}

#[test]
fn test_admin_route_forbids_plain_users() {
    let f = fixture(Some(UserRole::User));

    assert_eq!(
        admin_guard(&f.session),
        Decision::Redirect(Redirect::to(Route::Forbidden))
    );
    let location = f.navigator.navigate("/admin");
    assert_eq!(location.route, Route::Forbidden);
    assert_eq!(location.url, "/forbidden");
}

#[test]
fn test_admin_route_allows_admins() {
    let f = fixture(Some(UserRole::Admin));
    assert!(admin_guard(&f.session).is_allowed());
    assert_eq!(f.navigator.navigate("/admin").route, Route::Admin);
}

#[test]
fn test_role_requirement_on_authenticated_route() {
    let f = fixture(Some(UserRole::User));
    let admin_only = Route::Admin.definition();
    assert_eq!(
        auth_guard(&f.session, admin_only, "/admin"),
        Decision::Redirect(Redirect::to(Route::Forbidden))
    );

    let f = fixture(Some(UserRole::Admin));
    assert!(auth_guard(&f.session, admin_only, "/admin").is_allowed());
}

#[test]
fn test_unknown_and_empty_paths_go_to_login() {
    let f = fixture(None);
    assert_eq!(f.navigator.navigate("/does-not-exist").route, Route::Login);
    assert_eq!(f.navigator.navigate("").route, Route::Login);

    // signed in: the login fallback bounces on to the todo list
    let f = fixture(Some(UserRole::User));
    assert_eq!(f.navigator.navigate("/does-not-exist").route, Route::Todos);
}

#[test]
fn test_forbidden_page_is_always_reachable() {
    let f = fixture(None);
    assert_eq!(f.navigator.navigate("/forbidden").route, Route::Forbidden);
}

#[tokio::test]
async fn test_login_then_resume_destination() {
    let f = fixture(None);
    f.navigator.navigate("/todos");
    assert_eq!(f.navigator.location().route, Route::Login);

    f.session.login("alice", "Secret1").await.unwrap();
    let destination = f.navigator.post_login_destination();
    assert_eq!(destination, "/todos");
    assert_eq!(f.navigator.navigate(&destination).route, Route::Todos);
    assert_eq!(f.navigator.post_login_destination(), "/todos");
}

#[test]
fn test_location_changes_are_published() {
    let f = fixture(Some(UserRole::User));
    let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

    let log = Arc::clone(&seen);
    f.navigator.location_changes().subscribe(move |location| {
        log.lock().push(location.route);
    });
    f.navigator.navigate("/admin");
    f.navigator.navigate("/todos");

    assert_eq!(*seen.lock(), vec![Route::Forbidden, Route::Todos]);
}

#[test]
fn test_resolve_does_not_move() {
    let f = fixture(None);
    let location = f.navigator.resolve("/todos");
    assert_eq!(location.route, Route::Login);
    assert_eq!(f.navigator.location().return_url, None);
}

#[test]
fn test_admin_guard_checks_role_only() {
    let f = fixture(Some(UserRole::Admin));
    f.clock.advance(chrono::Duration::hours(2));

    assert!(!f.session.is_authenticated());
    assert!(f.session.is_admin());
    assert!(admin_guard(&f.session).is_allowed());
}
