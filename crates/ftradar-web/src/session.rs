use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::WebState;

pub(crate) const SESSION_COOKIE: &str = "ftradar_session";
const SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Server-side table of live session ids issued after a successful login.
/// Sessions expire after a fixed lifetime; expired ids are dropped whenever a
/// new session is opened.
#[derive(Clone)]
pub(crate) struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, Instant>>>,
    ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_ttl(SESSION_TTL)
    }
}

impl SessionRegistry {
    pub(crate) fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    pub(crate) async fn open(&self) -> String {
        let now = Instant::now();
        let id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, expires_at| *expires_at > now);
        if sessions.len() < before {
            tracing::debug!(expired = before - sessions.len(), "expired sessions pruned");
        }
        sessions.insert(id.clone(), now + self.ttl);
        id
    }

    pub(crate) async fn contains(&self, id: &str) -> bool {
        self.sessions
            .read()
            .await
            .get(id)
            .is_some_and(|expires_at| *expires_at > Instant::now())
    }

    pub(crate) async fn close(&self, id: &str) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Access state of one request, resolved before any page handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionContext {
    /// Access gate disabled by configuration.
    Public,
    Authenticated { session_id: String },
    Anonymous,
}

impl SessionContext {
    pub(crate) const fn is_authorized(&self) -> bool {
        !matches!(self, Self::Anonymous)
    }
}

impl FromRequestParts<WebState> for SessionContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &WebState,
    ) -> Result<Self, Self::Rejection> {
        if state.config.access.allow_public {
            return Ok(Self::Public);
        }
        let Some(session_id) = session_cookie(&parts.headers) else {
            return Ok(Self::Anonymous);
        };
        if state.sessions.contains(&session_id).await {
            Ok(Self::Authenticated { session_id })
        } else {
            Ok(Self::Anonymous)
        }
    }
}

/// Compares digests so the check does not short-circuit on the first differing byte.
/// Always false when no code is configured or the submission is blank.
pub(crate) fn verify_access_code(configured: Option<&str>, submitted: &str) -> bool {
    let Some(expected) = configured else {
        return false;
    };
    if submitted.is_empty() {
        return false;
    }
    blake3::hash(expected.as_bytes()) == blake3::hash(submitted.as_bytes())
}

pub(crate) fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub(crate) fn session_cookie_header(session_id: &str) -> String {
    format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Strict")
}

pub(crate) fn cleared_cookie_header() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Strict; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn access_code_requires_configured_and_matching_value() {
        assert!(verify_access_code(Some("s3cret"), "s3cret"));
        assert!(!verify_access_code(Some("s3cret"), "s3cre"));
        assert!(!verify_access_code(Some("s3cret"), ""));
        assert!(!verify_access_code(None, "anything"));
        assert!(!verify_access_code(None, ""));
    }

    #[test]
    fn session_cookie_is_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; ftradar_session=abc-123; lang=de"),
        );
        assert_eq!(session_cookie(&headers).as_deref(), Some("abc-123"));

        let mut empty = HeaderMap::new();
        empty.insert(header::COOKIE, HeaderValue::from_static("ftradar_session="));
        assert_eq!(session_cookie(&empty), None);
    }

    #[tokio::test]
    async fn registry_tracks_open_and_closed_sessions() {
        let registry = SessionRegistry::default();
        let id = registry.open().await;
        assert!(registry.contains(&id).await);
        assert!(registry.close(&id).await);
        assert!(!registry.contains(&id).await);
        assert!(!registry.close(&id).await);
    }

    #[tokio::test]
    async fn expired_sessions_are_rejected_and_pruned() {
        let registry = SessionRegistry::with_ttl(Duration::ZERO);
        let first = registry.open().await;
        assert!(!registry.contains(&first).await);

        let second = registry.open().await;
        assert!(!registry.contains(&second).await);
        assert_eq!(registry.len().await, 1);

        let live = SessionRegistry::default();
        let id = live.open().await;
        assert!(live.contains(&id).await);
        assert_eq!(live.len().await, 1);
    }
}
