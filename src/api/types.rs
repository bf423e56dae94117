//! Shared types for the API layer.

use std::sync::Arc;

use uuid::Uuid;

use crate::analysis::AnalysisService;
use crate::api::error::ApiError;
use crate::config::Settings;
use crate::session::{SessionStore, SharedChecker};

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all routes.
#[derive(Clone)]
pub struct ApiContext {
    pub sessions: Arc<SessionStore>,
    pub analyzer: Arc<dyn AnalysisService>,
    pub settings: Arc<Settings>,
}

impl ApiContext {
    pub fn new(settings: Settings, analyzer: Arc<dyn AnalysisService>) -> Self {
        Self {
            sessions: Arc::new(SessionStore::new(settings.max_sessions)),
            analyzer,
            settings: Arc::new(settings),
        }
    }

    /// Look up a session or fail with `NotFound`.
    pub fn session(&self, id: &Uuid) -> Result<SharedChecker, ApiError> {
        self.sessions
            .get(id)?
            .ok_or_else(|| ApiError::NotFound(format!("Session {id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::StaticAnalysisService;
    use crate::models::AnalysisResult;

    fn test_ctx(max_sessions: usize) -> ApiContext {
        let settings = Settings {
            max_sessions,
            ..Settings::default()
        };
        ApiContext::new(
            settings,
            Arc::new(StaticAnalysisService::new(AnalysisResult::fallback())),
        )
    }

    #[test]
    fn store_capacity_follows_settings() {
        assert_eq!(test_ctx(3).sessions.capacity(), 3);
    }

    #[test]
    fn unknown_session_is_not_found() {
        let ctx = test_ctx(3);
        let err = ctx.session(&Uuid::new_v4()).err().unwrap();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[test]
    fn known_session_is_returned() {
        let ctx = test_ctx(3);
        let (id, _) = ctx.sessions.create().unwrap();
        assert!(ctx.session(&id).is_ok());
    }
}
