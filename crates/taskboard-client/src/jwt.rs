//! Reading the role claim out of a bearer token.
//!
//! The signature is not checked; the server stays the authority. The claim
//! is only a fallback for choosing which dashboard to show.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::Value;
use taskboard_domain::Role;

/// Role named by the token's `role` claim, or the first entry of `roles`.
pub fn role_from_token(token: &str) -> Option<Role> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;

    let raw = claims
        .get("role")
        .and_then(Value::as_str)
        .or_else(|| {
            claims
                .get("roles")
                .and_then(Value::as_array)
                .and_then(|roles| roles.first())
                .and_then(Value::as_str)
        })?;
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(claims: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#),
            URL_SAFE_NO_PAD.encode(claims.as_bytes())
        )
    }

    #[test]
    fn test_role_claim() {
        assert_eq!(role_from_token(&token(r#"{"sub":"ann","role":"ADMIN"}"#)), Some(Role::Admin));
        assert_eq!(role_from_token(&token(r#"{"role":"user"}"#)), Some(Role::User));
    }

    #[test]
    fn test_roles_array_claim() {
        assert_eq!(
            role_from_token(&token(r#"{"roles":["ROLE_ADMIN","ROLE_USER"]}"#)),
            Some(Role::Admin)
        );
    }

    #[test]
    fn test_unreadable_tokens() {
        assert_eq!(role_from_token("not-a-jwt"), None);
        assert_eq!(role_from_token("a.%%%.c"), None);
        assert_eq!(role_from_token(&token(r#"{"sub":"ann"}"#)), None);
        assert_eq!(role_from_token(&token(r#"{"role":"owner"}"#)), None);
    }
}
