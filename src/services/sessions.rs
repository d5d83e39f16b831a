use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::RecommendationSession;

/// In-memory store of browsing sessions, one per adopter.
///
/// Sessions are ephemeral: entries expire after `idle_ttl_secs` without
/// access and nothing survives a restart. A missing entry reads as an idle
/// session.
#[derive(Clone)]
pub struct SessionCache {
    sessions: moka::future::Cache<String, RecommendationSession>,
}

impl SessionCache {
    pub fn new(capacity: u64, idle_ttl_secs: u64) -> Self {
        let sessions = moka::future::CacheBuilder::new(capacity)
            .time_to_idle(Duration::from_secs(idle_ttl_secs))
            .build();

        Self { sessions }
    }

    /// Current session for an adopter, or an idle one
    pub async fn get(&self, adopter_id: &str) -> RecommendationSession {
        let key = SessionKey::adopter(adopter_id);
        match self.sessions.get(&key).await {
            Some(session) => {
                tracing::trace!("Session hit: {}", key);
                session
            }
            None => {
                tracing::trace!("Session miss: {}", key);
                RecommendationSession::idle()
            }
        }
    }

    pub async fn put(&self, adopter_id: &str, session: RecommendationSession) {
        self.sessions
            .insert(SessionKey::adopter(adopter_id), session)
            .await;
    }

    pub async fn invalidate(&self, adopter_id: &str) {
        self.sessions.invalidate(&SessionKey::adopter(adopter_id)).await;
    }

    pub fn stats(&self) -> SessionStats {
        SessionStats {
            active_sessions: self.sessions.entry_count(),
        }
    }
}

/// Session cache statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    #[serde(rename = "activeSessions")]
    pub active_sessions: u64,
}

/// Session key builder
pub struct SessionKey;

impl SessionKey {
    pub fn adopter(adopter_id: &str) -> String {
        format!("session:{}", adopter_id)
    }
}
