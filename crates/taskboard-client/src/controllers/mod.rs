//! View controllers: a reducer paired with the services it needs.
//!
//! Each module exposes free async functions that perform one request and
//! return its result (used by the TUI, which spawns them and feeds the result
//! back into a reducer on its own loop) and a controller that owns a reducer
//! and awaits those functions in place (used by the CLI and tests).

pub mod archived;
pub mod auth;
pub mod board_list;
pub mod kanban;
pub mod notifications;

use taskboard_domain::Role;

use crate::api::Services;
use crate::jwt;

/// Role of the caller: the profile endpoint, else the token's claim, else USER.
pub async fn resolve_role(services: &Services, token: Option<&str>) -> Role {
    match services.users.profile().await {
        Ok(profile) => profile.role,
        Err(err) => {
            tracing::warn!(error = %err, "Profile unavailable, reading role from token");
            token.and_then(jwt::role_from_token).unwrap_or_default()
        }
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use taskboard_core::TaskboardError;
    use taskboard_domain::Profile;

    use super::test_support::mock_services;
    use super::*;
    use crate::api::MockUserApi;

    fn failing_profile() -> Services {
        let mut users = MockUserApi::new();
        users
            .expect_profile()
            .returning(|| Err(TaskboardError::http(500, "boom")));
        Services {
            users: Arc::new(users),
            ..mock_services()
        }
    }

    #[tokio::test]
    async fn test_profile_role_wins() {
        let mut users = MockUserApi::new();
        users.expect_profile().returning(|| {
            Ok(Profile {
                username: "ann".into(),
                email: String::new(),
                role: Role::Admin,
            })
        });
        let services = Services {
            users: Arc::new(users),
            ..mock_services()
        };
        assert_eq!(resolve_role(&services, None).await, Role::Admin);
    }

    #[tokio::test]
    async fn test_falls_back_to_token_claim_then_user() {
        let services = failing_profile();
        let token = format!("h.{}.s", URL_SAFE_NO_PAD.encode(br#"{"role":"ADMIN"}"#));
        assert_eq!(resolve_role(&services, Some(&token)).await, Role::Admin);
        assert_eq!(resolve_role(&services, Some("opaque")).await, Role::User);
        assert_eq!(resolve_role(&services, None).await, Role::User);
    }
}
