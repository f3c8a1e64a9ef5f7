//! Session management

use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::api::{ApiResult, AuthApi};
use super::clock::{Clock, SystemClock};
use super::models::{
    AuthResponse, LoginRequest, RefreshRequest, RegisterRequest, User, UserRole, UserSession,
};
use super::permissions::{Permission, Permissions};
use super::store::{KeyValueStore, EXPIRY_KEY, TOKEN_KEY, USER_KEY};
use super::validation;
use crate::error::{AuthError, Error, Result};
use crate::observable::Subject;

/// Owns the authentication state of the client.
///
/// Build one at the composition root and share it by `Arc` with route
/// guards, the API client and views. The three observable projections
/// (user, authenticated flag, session) are always updated together and
/// only then notified.
pub struct SessionManager {
    api: Arc<dyn AuthApi>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    current_user: Subject<Option<User>>,
    authenticated: Subject<bool>,
    current_session: Subject<Option<UserSession>>,
    next_ticket: AtomicU64,
    /// Ticket of the latest install or logout; older responses are stale
    high_water: Mutex<u64>,
}

impl SessionManager {
    /// Create a manager on the wall clock and hydrate from storage
    pub fn new(api: Arc<dyn AuthApi>, store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_clock(api, store, Arc::new(SystemClock))
    }

    pub fn with_clock(
        api: Arc<dyn AuthApi>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let manager = Self {
            api,
            store,
            clock,
            current_user: Subject::new(None),
            authenticated: Subject::new(false),
            current_session: Subject::new(None),
            next_ticket: AtomicU64::new(1),
            high_water: Mutex::new(0),
        };
        manager.hydrate();
        manager
    }

    fn hydrate(&self) {
        let token = self.store.get(TOKEN_KEY);
        let user = self.stored_user();

        if let (Some(_), Some(user)) = (&token, user) {
            if self.is_authenticated() {
                info!("Restored session for {}", user.username);
                self.set_projections(Some(user), true);
                return;
            }
            info!("Stored session for {} has expired", user.username);
        } else if token.is_some() {
            warn!("Discarding partial session state");
        }

        self.clear_storage();
        self.set_projections(None, false);
    }

    /// Register a new account and install its session
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserSession> {
        let request = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        validation::validate_register(&request)?;

        let ticket = self.issue_ticket();
        debug!("Registering {}", request.username);
        let outcome = self.api.register(&request).await;
        self.complete(ticket, outcome, "register")
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<UserSession> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        validation::validate_login(&request)?;

        let ticket = self.issue_ticket();
        debug!("Logging in {}", request.username);
        let outcome = self.api.login(&request).await;
        self.complete(ticket, outcome, "login")
    }

    /// Exchange the held token for a fresh one
    pub async fn refresh_token(&self) -> Result<UserSession> {
        let token = self.token().ok_or(Error::SessionAbsent)?;

        let ticket = self.issue_ticket();
        let outcome = self.api.refresh(&RefreshRequest { token }).await;
        if matches!(&outcome, Err(failure) if failure.status == 401) {
            warn!("Token refresh rejected, clearing session");
            self.logout();
        }
        self.complete(ticket, outcome, "refresh")
    }

    /// Clear persisted and in-memory session state. Idempotent.
    pub fn logout(&self) {
        let ticket = self.issue_ticket();
        let had_session = {
            let mut high_water = self.high_water.lock();
            *high_water = (*high_water).max(ticket);
            let had_session = self.current_user.get().is_some() || self.store.get(TOKEN_KEY).is_some();
            self.clear_storage();
            self.set_projections(None, false);
            had_session
        };

        if had_session {
            info!("Logged out");
            self.notify_all();
        }
    }

    /// True iff a token is held and the persisted expiry lies in the future
    pub fn is_authenticated(&self) -> bool {
        self.store.get(TOKEN_KEY).is_some()
            && self
                .stored_expiry()
                .is_some_and(|expiry| self.clock.now_millis() < expiry)
    }

    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    pub fn current_user(&self) -> Option<User> {
        self.current_user.get()
    }

    pub fn current_session(&self) -> Option<UserSession> {
        self.current_session.get()
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.current_user().is_some_and(|u| u.role == role)
    }

    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        self.current_user().is_some_and(|u| roles.contains(&u.role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin)
    }

    pub fn permissions(&self) -> Permissions {
        Permissions::for_user(self.current_user().as_ref())
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().has(permission)
    }

    /// Whole seconds until the token expires, 0 when none is recorded
    pub fn token_expiry_remaining(&self) -> u64 {
        match self.stored_expiry() {
            Some(expiry) => {
                let remaining = expiry.saturating_sub(self.clock.now_millis()).max(0);
                (remaining / 1000) as u64
            }
            None => 0,
        }
    }

    pub fn user_changes(&self) -> &Subject<Option<User>> {
        &self.current_user
    }

    pub fn auth_changes(&self) -> &Subject<bool> {
        &self.authenticated
    }

    pub fn session_changes(&self) -> &Subject<Option<UserSession>> {
        &self.current_session
    }

    fn issue_ticket(&self) -> u64 {
        self.next_ticket.fetch_add(1, Ordering::SeqCst)
    }

    fn complete(
        &self,
        ticket: u64,
        outcome: ApiResult<AuthResponse>,
        action: &str,
    ) -> Result<UserSession> {
        match outcome {
            Ok(response) => self.install(ticket, &response),
            Err(failure) => {
                let err = AuthError::from_status(failure.status, failure.message, self.clock.now());
                error!("Authentication error during {}: {}", action, err);
                Err(err.into())
            }
        }
    }

    /// Persist token, expiry and user, then publish one snapshot
    fn install(&self, ticket: u64, response: &AuthResponse) -> Result<UserSession> {
        let installed = {
            let mut high_water = self.high_water.lock();
            if ticket <= *high_water {
                warn!(
                    "Dropping stale authentication response for {}",
                    response.username
                );
                return Err(Error::Superseded);
            }

            let user = response.user();
            let expiry = self
                .clock
                .now_millis()
                .saturating_add(response.expires_in.saturating_mul(1000));
            *high_water = ticket;
            match self.persist(&response.token, expiry, &user) {
                Ok(()) => {
                    self.set_projections(Some(user), self.is_authenticated());
                    Ok(self.current_session.get())
                }
                Err(e) => {
                    // No partial session: storage and projections both go empty
                    error!("Failed to persist session: {}", e);
                    self.clear_storage();
                    self.set_projections(None, false);
                    Err(e)
                }
            }
        };

        self.notify_all();
        let session = installed?
            .ok_or_else(|| Error::Other("Session vanished during install".into()))?;
        info!(
            "Session installed for {} ({}), expires in {}s",
            session.user.username,
            session.user.role,
            response.expires_in
        );
        Ok(session)
    }

    fn persist(&self, token: &str, expiry: i64, user: &User) -> Result<()> {
        self.store.set(TOKEN_KEY, token)?;
        self.store.set(EXPIRY_KEY, &expiry.to_string())?;
        self.store.set(USER_KEY, &serde_json::to_string(user)?)?;
        Ok(())
    }

    fn clear_storage(&self) {
        for key in [TOKEN_KEY, USER_KEY, EXPIRY_KEY] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to remove {} from session store: {}", key, e);
            }
        }
    }

    fn stored_user(&self) -> Option<User> {
        let json = self.store.get(USER_KEY)?;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Ignoring malformed stored user record: {}", e);
                None
            }
        }
    }

    fn stored_expiry(&self) -> Option<i64> {
        self.store.get(EXPIRY_KEY)?.trim().parse().ok()
    }

    /// Session snapshot as derived from storage
    fn stored_session(&self) -> Option<UserSession> {
        let token = self.store.get(TOKEN_KEY)?;
        let user = self.stored_user()?;
        let expires_at = self
            .stored_expiry()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
            .unwrap_or_else(|| self.clock.now());
        Some(UserSession {
            user,
            token,
            expires_at,
            is_authenticated: self.is_authenticated(),
        })
    }

    fn set_projections(&self, user: Option<User>, authenticated: bool) {
        let session = if user.is_some() {
            self.stored_session()
        } else {
            None
        };
        self.current_user.replace(user);
        self.authenticated.replace(authenticated);
        self.current_session.replace(session);
    }

    fn notify_all(&self) {
        self.current_user.notify();
        self.authenticated.notify();
        self.current_session.notify();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::api::ApiFailure;
    use crate::auth::clock::ManualClock;
    use crate::auth::store::MemoryStore;
    use async_trait::async_trait;

    struct FixedApi {
        role: UserRole,
        expires_in: i64,
    }

    impl FixedApi {
        fn respond(&self, username: &str) -> ApiResult<AuthResponse> {
            Ok(AuthResponse {
                token: format!("token-{}", username),
                token_type: "Bearer".into(),
                username: username.to_string(),
                email: format!("{}@example.com", username),
                role: self.role,
                expires_in: self.expires_in,
            })
        }
    }

    #[async_trait]
    impl AuthApi for FixedApi {
        async fn register(&self, request: &RegisterRequest) -> ApiResult<AuthResponse> {
            self.respond(&request.username)
        }

        async fn login(&self, request: &LoginRequest) -> ApiResult<AuthResponse> {
            if request.password == "wrong" {
                return Err(ApiFailure::new(401, None));
            }
            self.respond(&request.username)
        }

        async fn refresh(&self, _request: &RefreshRequest) -> ApiResult<AuthResponse> {
            self.respond("refreshed")
        }
    }

    fn manager(role: UserRole) -> (SessionManager, Arc<MemoryStore>, Arc<ManualClock>) {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let api = Arc::new(FixedApi {
            role,
            expires_in: 3600,
        });
        let manager = SessionManager::with_clock(api, store.clone(), clock.clone());
        (manager, store, clock)
    }

    #[tokio::test]
    async fn test_login_installs_session() {
        let (manager, store, _) = manager(UserRole::User);
        let session = manager.login("alice", "Secret1").await.unwrap();

        assert_eq!(session.user.username, "alice");
        assert!(session.is_authenticated);
        assert!(manager.is_authenticated());
        assert_eq!(manager.token().as_deref(), Some("token-alice"));
        assert_eq!(manager.token_expiry_remaining(), 3600);
        assert!(store.get(USER_KEY).is_some());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_session() {
        let (manager, _, _) = manager(UserRole::User);
        manager.login("alice", "Secret1").await.unwrap();

        let err = manager.login("bob", "wrong").await.unwrap_err();
        match err {
            Error::Auth(auth) => {
                assert_eq!(auth.status, 401);
                assert_eq!(auth.message, "Invalid credentials");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(manager.current_user().unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_stale_ticket_is_superseded() {
        let (manager, _, _) = manager(UserRole::User);
        let stale = manager.issue_ticket();
        manager.login("alice", "Secret1").await.unwrap();

        let response = FixedApi {
            role: UserRole::Admin,
            expires_in: 10,
        }
        .respond("mallory")
        .unwrap();
        assert!(matches!(manager.install(stale, &response), Err(Error::Superseded)));
        assert_eq!(manager.current_user().unwrap().username, "alice");
    }

    #[tokio::test]
    async fn test_logout_supersedes_in_flight_response() {
        let (manager, _, _) = manager(UserRole::User);
        let in_flight = manager.issue_ticket();
        manager.logout();

        let response = FixedApi {
            role: UserRole::User,
            expires_in: 10,
        }
        .respond("alice")
        .unwrap();
        assert!(manager.install(in_flight, &response).is_err());
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_huge_expires_in_saturates() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let api = Arc::new(FixedApi {
            role: UserRole::User,
            expires_in: i64::MAX / 1000 + 1,
        });
        let manager = SessionManager::with_clock(api, store.clone(), clock);

        manager.login("alice", "Secret1").await.unwrap();
        assert!(manager.is_authenticated());
        assert_eq!(store.get(EXPIRY_KEY).as_deref(), Some(i64::MAX.to_string().as_str()));
        assert!(manager.token_expiry_remaining() > 0);
    }

    #[test]
    fn test_corrupt_expiry_near_min_reads_as_expired() {
        let (manager, store, _) = manager(UserRole::User);
        store.set(TOKEN_KEY, "token").unwrap();
        store.set(EXPIRY_KEY, &i64::MIN.to_string()).unwrap();

        assert_eq!(manager.token_expiry_remaining(), 0);
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn test_expiry_remaining_floors_and_clamps() {
        let (manager, store, clock) = manager(UserRole::User);
        assert_eq!(manager.token_expiry_remaining(), 0);

        let now = clock.now_millis();
        store.set(EXPIRY_KEY, &(now + 1_999).to_string()).unwrap();
        assert_eq!(manager.token_expiry_remaining(), 1);

        clock.advance(chrono::Duration::seconds(5));
        assert_eq!(manager.token_expiry_remaining(), 0);
    }
}
