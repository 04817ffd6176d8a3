//! Session data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::auth::SessionTokenVersion;

/// Session metadata held by the session service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub uuid: Uuid,

    /// User the session was issued to.
    pub uid: String,

    pub version: SessionTokenVersion,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
}

/// Session issuance result with the one-time raw token.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}

/// Who a request acts as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    #[default]
    Anonymous,
    User {
        uid: String,
        session: Uuid,
    },
}

/// Per-request session state handed to handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub identity: Identity,
}

impl SessionContext {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            identity: Identity::Anonymous,
        }
    }

    /// Signed-in user id, if any.
    pub fn uid(&self) -> Option<&str> {
        match &self.identity {
            Identity::User { uid, .. } => Some(uid),
            Identity::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.identity, Identity::User { .. })
    }
}

impl From<&Session> for SessionContext {
    fn from(session: &Session) -> Self {
        Self {
            identity: Identity::User {
                uid: session.uid.clone(),
                session: session.uuid,
            },
        }
    }
}
