//! Session cookie handling.

use jiff::SignedDuration;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "storefront_session";

/// The session token from a `Cookie` request header, if present.
pub fn session_token_from_cookie_header(header: &str) -> Option<&str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value carrying a session token for `max_age`.
#[must_use]
pub fn session_cookie(token: &str, max_age: SignedDuration) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={}",
        max_age.as_secs().max(0)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_session_cookie_among_others() {
        assert_eq!(
            session_token_from_cookie_header("a=1; storefront_session=sf_v1_x.y ; b=2"),
            Some("sf_v1_x.y")
        );
    }

    #[test]
    fn missing_or_empty_cookie_is_none() {
        assert_eq!(session_token_from_cookie_header("a=1; b=2"), None);
        assert_eq!(session_token_from_cookie_header("storefront_session="), None);
        assert_eq!(session_token_from_cookie_header(""), None);
    }

    #[test]
    fn set_cookie_carries_max_age() {
        let cookie = session_cookie("sf_v1_x.y", SignedDuration::from_mins(30));

        assert!(cookie.starts_with("storefront_session=sf_v1_x.y;"));
        assert!(cookie.ends_with("Max-Age=1800"));
    }
}
