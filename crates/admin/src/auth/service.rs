//! Session service.

use async_trait::async_trait;
use jiff::{SignedDuration, Timestamp};
use mockall::automock;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{
    IssuedSession, Session, SessionContext, SessionError, SessionTokenVersion,
    format_session_token, generate_session_secret, parse_session_token,
    session_token_from_cookie_header, session_verifier, verifiers_match,
};

#[automock]
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Issue a session for `uid`, valid from `now` for the configured TTL.
    async fn issue(&self, uid: &str, now: Timestamp) -> Result<IssuedSession, SessionError>;

    /// Resolve a raw token to its live session.
    async fn verify(&self, token: &str, now: Timestamp) -> Result<Session, SessionError>;

    /// Revoke a session. Returns `true` if it was live.
    async fn revoke(&self, session: Uuid, now: Timestamp) -> Result<bool, SessionError>;
}

#[derive(Debug)]
struct StoredSession {
    session: Session,
    verifier: String,
}

/// Session service holding sessions in process memory.
#[derive(Debug)]
pub struct MemorySessionService {
    ttl: SignedDuration,
    sessions: RwLock<FxHashMap<Uuid, StoredSession>>,
}

impl MemorySessionService {
    #[must_use]
    pub fn new(ttl: SignedDuration) -> Self {
        Self {
            ttl,
            sessions: RwLock::default(),
        }
    }

    pub fn ttl(&self) -> SignedDuration {
        self.ttl
    }
}

#[async_trait]
impl SessionService for MemorySessionService {
    async fn issue(&self, uid: &str, now: Timestamp) -> Result<IssuedSession, SessionError> {
        let session_uuid = Uuid::now_v7();
        let version = SessionTokenVersion::V1;
        let secret = generate_session_secret();
        let token = format_session_token(session_uuid, version, &secret);
        let expires_at = now.checked_add(self.ttl).map_err(SessionError::Clock)?;

        let session = Session {
            uuid: session_uuid,
            uid: uid.to_string(),
            version,
            created_at: now,
            expires_at,
            revoked_at: None,
        };

        self.sessions.write().await.insert(
            session_uuid,
            StoredSession {
                session: session.clone(),
                verifier: session_verifier(&session_uuid, version, &secret),
            },
        );

        info!(session = %session_uuid, uid, %expires_at, "issued session");

        Ok(IssuedSession { token, session })
    }

    async fn verify(&self, token: &str, now: Timestamp) -> Result<Session, SessionError> {
        let parsed = parse_session_token(token)?;
        let sessions = self.sessions.read().await;

        let stored = sessions
            .get(&parsed.session_uuid)
            .ok_or(SessionError::NotFound)?;

        if stored.session.version != parsed.version {
            return Err(SessionError::NotFound);
        }

        let verifier = session_verifier(&parsed.session_uuid, parsed.version, &parsed.secret);

        if !verifiers_match(&verifier, &stored.verifier) {
            return Err(SessionError::InvalidSecret);
        }

        if stored.session.revoked_at.is_some() {
            return Err(SessionError::Revoked);
        }

        if now >= stored.session.expires_at {
            return Err(SessionError::Expired);
        }

        Ok(stored.session.clone())
    }

    async fn revoke(&self, session: Uuid, now: Timestamp) -> Result<bool, SessionError> {
        let mut sessions = self.sessions.write().await;
        let stored = sessions.get_mut(&session).ok_or(SessionError::NotFound)?;

        if stored.session.revoked_at.is_some() || now >= stored.session.expires_at {
            debug!(%session, "session already inactive");

            return Ok(false);
        }

        stored.session.revoked_at = Some(now);

        info!(%session, "revoked session");

        Ok(true)
    }
}

/// Resolve the identity behind a request's `Cookie` header.
///
/// Missing cookies and every verification failure resolve to the anonymous
/// identity.
pub async fn resolve_identity(
    sessions: &dyn SessionService,
    cookie_header: Option<&str>,
    now: Timestamp,
) -> SessionContext {
    let Some(token) = cookie_header.and_then(session_token_from_cookie_header) else {
        return SessionContext::anonymous();
    };

    match sessions.verify(token, now).await {
        Ok(session) => SessionContext::from(&session),
        Err(error) => {
            warn!(%error, "session verification failed");

            SessionContext::anonymous()
        }
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use crate::auth::{Identity, SESSION_COOKIE};

    use super::*;

    fn service() -> MemorySessionService {
        MemorySessionService::new(SignedDuration::from_mins(30))
    }

    fn now() -> Timestamp {
        Timestamp::UNIX_EPOCH + 1_000.hours()
    }

    #[tokio::test]
    async fn issued_token_verifies_until_expiry() -> TestResult {
        let sessions = service();
        let issued = sessions.issue("user-1", now()).await?;

        let session = sessions.verify(&issued.token, now() + 29.minutes()).await?;

        assert_eq!(session.uid, "user-1");
        assert_eq!(session.expires_at, now() + 30.minutes());

        let result = sessions.verify(&issued.token, now() + 30.minutes()).await;

        assert!(
            matches!(result, Err(SessionError::Expired)),
            "expected Expired, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn revoked_session_no_longer_verifies() -> TestResult {
        let sessions = service();
        let issued = sessions.issue("user-1", now()).await?;

        assert!(sessions.revoke(issued.session.uuid, now()).await?);
        assert!(!sessions.revoke(issued.session.uuid, now()).await?);

        let result = sessions.verify(&issued.token, now()).await;

        assert!(
            matches!(result, Err(SessionError::Revoked)),
            "expected Revoked, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn tampered_secret_is_rejected() -> TestResult {
        let sessions = service();
        let issued = sessions.issue("user-1", now()).await?;
        let other = sessions.issue("user-2", now()).await?;

        let (id, _) = issued.token.split_once('.').ok_or("malformed token")?;
        let (_, secret) = other.token.split_once('.').ok_or("malformed token")?;

        let result = sessions.verify(&format!("{id}.{secret}"), now()).await;

        assert!(
            matches!(result, Err(SessionError::InvalidSecret)),
            "expected InvalidSecret, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() -> TestResult {
        let issued = service().issue("user-1", now()).await?;

        let result = service().verify(&issued.token, now()).await;

        assert!(matches!(result, Err(SessionError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn cookie_resolves_to_user_identity() -> TestResult {
        let sessions = service();
        let issued = sessions.issue("user-1", now()).await?;
        let header = format!("theme=dark; {SESSION_COOKIE}={}", issued.token);

        let context = resolve_identity(&sessions, Some(&header), now()).await;

        assert_eq!(
            context.identity,
            Identity::User {
                uid: "user-1".to_string(),
                session: issued.session.uuid,
            }
        );
        assert_eq!(context.uid(), Some("user-1"));

        Ok(())
    }

    #[tokio::test]
    async fn verification_failure_resolves_to_anonymous() {
        let mut sessions = MockSessionService::new();

        sessions
            .expect_verify()
            .returning(|_, _| Err(SessionError::Expired));

        let header = format!("{SESSION_COOKIE}=sf_v1_x.y");

        let context = resolve_identity(&sessions, Some(&header), now()).await;

        assert!(!context.is_authenticated());
    }

    #[tokio::test]
    async fn missing_cookie_skips_verification() {
        let mut sessions = MockSessionService::new();

        sessions.expect_verify().never();

        let context = resolve_identity(&sessions, Some("theme=dark"), now()).await;

        assert_eq!(context, SessionContext::anonymous());

        let context = resolve_identity(&sessions, None, now()).await;

        assert_eq!(context.identity, Identity::Anonymous);
    }
}
