//! Session errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session token format is invalid")]
    InvalidFormat,

    #[error("session token uses an unsupported version")]
    UnsupportedVersion,

    #[error("session token secret is invalid")]
    InvalidSecret,

    #[error("session not found")]
    NotFound,

    #[error("session has expired")]
    Expired,

    #[error("session has been revoked")]
    Revoked,

    #[error("session expiry is out of range")]
    Clock(#[source] jiff::Error),
}
