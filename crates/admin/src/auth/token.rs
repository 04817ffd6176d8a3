//! Session token formatting, parsing, and verifier construction.

use std::{fmt, str::FromStr};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use zeroize::Zeroize;

use crate::auth::SessionError;

/// Session token identifier prefix.
pub const SESSION_TOKEN_PREFIX: &str = "sf";

/// Number of secret bytes encoded in a token.
pub const SESSION_TOKEN_SECRET_BYTES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTokenVersion {
    V1,
}

impl SessionTokenVersion {
    #[must_use]
    pub const fn segment(self) -> &'static str {
        match self {
            Self::V1 => "v1",
        }
    }
}

impl FromStr for SessionTokenVersion {
    type Err = SessionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "v1" => Ok(Self::V1),
            _ => Err(SessionError::UnsupportedVersion),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SessionSecret {
    bytes: [u8; SESSION_TOKEN_SECRET_BYTES],
}

impl SessionSecret {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SESSION_TOKEN_SECRET_BYTES]) -> Self {
        Self { bytes }
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SESSION_TOKEN_SECRET_BYTES] {
        &self.bytes
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(**redacted**)")
    }
}

impl Drop for SessionSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

#[derive(Debug, Clone)]
pub struct ParsedSessionToken {
    pub session_uuid: Uuid,
    pub version: SessionTokenVersion,
    pub secret: SessionSecret,
}

#[must_use]
pub fn generate_session_secret() -> SessionSecret {
    let mut secret = [0_u8; SESSION_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    SessionSecret::from_bytes(secret)
}

/// Format: `sf_{version}_{uuid_simple}.{secret_base64url}`
#[must_use]
pub fn format_session_token(
    session_uuid: Uuid,
    version: SessionTokenVersion,
    secret: &SessionSecret,
) -> String {
    format!(
        "{SESSION_TOKEN_PREFIX}_{}_{}.{}",
        version.segment(),
        session_uuid.simple(),
        URL_SAFE_NO_PAD.encode(secret.as_bytes())
    )
}

/// Split a raw token into its session id, version and secret.
///
/// # Errors
///
/// Returns [`SessionError::InvalidFormat`] for a malformed token,
/// [`SessionError::UnsupportedVersion`] for an unknown version segment and
/// [`SessionError::InvalidSecret`] when the secret does not decode to
/// [`SESSION_TOKEN_SECRET_BYTES`] bytes.
pub fn parse_session_token(token: &str) -> Result<ParsedSessionToken, SessionError> {
    let (prefix_and_id, encoded_secret) =
        token.split_once('.').ok_or(SessionError::InvalidFormat)?;

    let mut id_parts = prefix_and_id.splitn(3, '_');

    let prefix = id_parts.next().ok_or(SessionError::InvalidFormat)?;
    let version_segment = id_parts.next().ok_or(SessionError::InvalidFormat)?;
    let uuid_segment = id_parts.next().ok_or(SessionError::InvalidFormat)?;

    if prefix != SESSION_TOKEN_PREFIX {
        return Err(SessionError::InvalidFormat);
    }

    let version = SessionTokenVersion::from_str(version_segment)?;

    let session_uuid = Uuid::try_parse(uuid_segment).map_err(|_err| SessionError::InvalidFormat)?;

    let mut decoded = URL_SAFE_NO_PAD
        .decode(encoded_secret)
        .map_err(|_err| SessionError::InvalidSecret)?;

    let secret: Result<[u8; SESSION_TOKEN_SECRET_BYTES], _> = decoded.as_slice().try_into();

    decoded.zeroize();

    Ok(ParsedSessionToken {
        session_uuid,
        version,
        secret: SessionSecret::from_bytes(secret.map_err(|_err| SessionError::InvalidSecret)?),
    })
}

/// Hex SHA-256 over `{uuid_simple}:{version}:{secret_base64url}`.
#[must_use]
pub fn session_verifier(
    session_uuid: &Uuid,
    version: SessionTokenVersion,
    secret: &SessionSecret,
) -> String {
    let mut material = format!(
        "{}:{}:{}",
        session_uuid.simple(),
        version.segment(),
        URL_SAFE_NO_PAD.encode(secret.as_bytes())
    );

    let verifier = format!("{:x}", Sha256::digest(material.as_bytes()));

    material.zeroize();

    verifier
}

/// Compare two verifiers in time independent of where they differ.
#[must_use]
pub fn verifiers_match(left: &str, right: &str) -> bool {
    left.len() == right.len()
        && left
            .bytes()
            .zip(right.bytes())
            .fold(0_u8, |diff, (a, b)| diff | (a ^ b))
            == 0
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_and_format_round_trip() -> TestResult {
        let session_uuid = Uuid::nil();
        let secret = SessionSecret::from_bytes([0xAB; SESSION_TOKEN_SECRET_BYTES]);
        let token = format_session_token(session_uuid, SessionTokenVersion::V1, &secret);

        assert!(token.starts_with("sf_v1_00000000000000000000000000000000."));

        let parsed = parse_session_token(&token)?;

        assert_eq!(parsed.session_uuid, session_uuid);
        assert_eq!(parsed.version, SessionTokenVersion::V1);
        assert_eq!(parsed.secret.as_bytes(), secret.as_bytes());

        Ok(())
    }

    #[test]
    fn parse_rejects_malformed_tokens() {
        let uuid = Uuid::nil().simple();

        assert!(matches!(
            parse_session_token("nope"),
            Err(SessionError::InvalidFormat)
        ));
        assert!(matches!(
            parse_session_token(&format!("lt_v1_{uuid}.AAAA")),
            Err(SessionError::InvalidFormat)
        ));
        assert!(matches!(
            parse_session_token(&format!("sf_v9_{uuid}.AAAA")),
            Err(SessionError::UnsupportedVersion)
        ));
        assert!(matches!(
            parse_session_token(&format!("sf_v1_{uuid}.AAAA")),
            Err(SessionError::InvalidSecret)
        ));
        assert!(matches!(
            parse_session_token(&format!("sf_v1_{uuid}.!!")),
            Err(SessionError::InvalidSecret)
        ));
    }

    #[test]
    fn verifier_is_deterministic_hex() {
        let uuid = Uuid::nil();
        let secret = SessionSecret::from_bytes([0xCD; SESSION_TOKEN_SECRET_BYTES]);

        let first = session_verifier(&uuid, SessionTokenVersion::V1, &secret);
        let second = session_verifier(&uuid, SessionTokenVersion::V1, &secret);

        assert_eq!(first, second, "verifier must be deterministic");
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn verifier_matches_known_digest() {
        let uuid = Uuid::nil();
        let secret = SessionSecret::from_bytes([0; SESSION_TOKEN_SECRET_BYTES]);
        let material = format!(
            "{}:v1:{}",
            uuid.simple(),
            URL_SAFE_NO_PAD.encode([0_u8; SESSION_TOKEN_SECRET_BYTES])
        );

        assert_eq!(
            session_verifier(&uuid, SessionTokenVersion::V1, &secret),
            format!("{:x}", Sha256::digest(material.as_bytes()))
        );
    }

    #[test]
    fn verifiers_match_only_when_equal() {
        let uuid = Uuid::nil();
        let first = session_verifier(
            &uuid,
            SessionTokenVersion::V1,
            &SessionSecret::from_bytes([1; SESSION_TOKEN_SECRET_BYTES]),
        );
        let second = session_verifier(
            &uuid,
            SessionTokenVersion::V1,
            &SessionSecret::from_bytes([2; SESSION_TOKEN_SECRET_BYTES]),
        );

        assert!(verifiers_match(&first, &first.clone()));
        assert!(!verifiers_match(&first, &second));
        assert!(!verifiers_match(&first, &first[..10]));
    }

    #[test]
    fn generated_secrets_differ() {
        assert_ne!(generate_session_secret(), generate_session_secret());
    }
}
