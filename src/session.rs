use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::Role;

/// Snapshot of an authenticated session. Cloned out of the store so readers
/// never observe a half-updated entry.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub role: Role,
}

/// In-memory session registry, written by login/logout and read by the
/// request extractor. Tokens are opaque uuids.
#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: Session) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.token.clone(), session);
    }

    pub fn get(&self, token: &str) -> Option<Session> {
        self.sessions.lock().unwrap().get(token).cloned()
    }

    pub fn remove(&self, token: &str) -> bool {
        self.sessions.lock().unwrap().remove(token).is_some()
    }
}
