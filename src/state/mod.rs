pub mod session;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::AppConfig;

pub use self::session::StudioSession;

pub type SharedState = Arc<AppState>;
/// Lock-guarded handle to a single session.
pub type SessionHandle = Arc<RwLock<StudioSession>>;

/// Central application state: configuration plus every open studio session.
pub struct AppState {
    config: AppConfig,
    sessions: DashMap<Uuid, SessionHandle>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            config,
            sessions: DashMap::new(),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Register a session and return its shared handle.
    pub fn insert_session(&self, session: StudioSession) -> SessionHandle {
        let id = session.id;
        let handle = Arc::new(RwLock::new(session));
        self.sessions.insert(id, handle.clone());
        handle
    }

    /// Look up a session. The map guard is released before returning.
    pub fn session(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.get(&id).map(|entry| entry.value().clone())
    }

    pub fn remove_session(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.remove(&id).map(|(_, handle)| handle)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
