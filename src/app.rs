//! Composition root

use std::sync::Arc;

use crate::auth::{AuthApi, FileStore, HttpAuthApi, KeyValueStore, SessionManager};
use crate::config::Config;
use crate::error::Result;
use crate::http::ApiClient;
use crate::routing::Navigator;
use crate::todos::TodoService;

/// Application services wired together around one session
pub struct App {
    pub config: Config,
    pub session: Arc<SessionManager>,
    pub navigator: Arc<Navigator>,
    pub client: Arc<ApiClient>,
    pub todos: TodoService,
}

impl App {
    /// Wire the HTTP collaborators and a file-backed session store
    pub fn from_config(config: Config) -> Result<Self> {
        let api: Arc<dyn AuthApi> = Arc::new(HttpAuthApi::new(&config.api)?);
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.storage.path));
        let session = Arc::new(SessionManager::new(api, store));
        Self::assemble(config, session)
    }

    /// Wire around an existing session manager
    pub fn assemble(config: Config, session: Arc<SessionManager>) -> Result<Self> {
        let navigator = Arc::new(Navigator::new(Arc::clone(&session)));
        let client = Arc::new(ApiClient::new(
            &config.api,
            Arc::clone(&session),
            Arc::clone(&navigator),
        )?);
        let todos = TodoService::new(Arc::clone(&client));
        Ok(Self {
            config,
            session,
            navigator,
            client,
            todos,
        })
    }
}
