//! Sign-in, registration and password recovery requests.
//!
//! None of these touch the session; the caller logs the returned user in.

use taskboard_core::{FieldErrors, FormField, TaskboardError, TaskboardResult};
use taskboard_domain::auth_forms::{EMAIL_TAKEN, USER_EXISTS};
use taskboard_domain::{AuthRequest, Credentials, ForgotPassword, PasswordReset, Registration, User};

use crate::api::Services;
use crate::jwt;

pub const TOKEN_MISSING: &str = "Token not returned from server";
pub const REGISTERED: &str = "Registration successful! Redirecting to login...";
pub const RESET_LINK_SENT: &str = "Reset link sent to your email";
pub const PASSWORD_RESET: &str = "Password reset successfully! Redirecting to login...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    SignedIn(User),
    /// Success message to show before returning to the login screen.
    Message(String),
}

pub async fn login(services: &Services, credentials: &Credentials) -> TaskboardResult<User> {
    let response = services.auth.login(credentials).await?;
    let token = response
        .token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| TaskboardError::Validation(TOKEN_MISSING.to_string()))?;
    let role = response
        .role
        .or_else(|| jwt::role_from_token(&token))
        .unwrap_or_default();
    let username = if response.username.is_empty() {
        credentials.username.clone()
    } else {
        response.username
    };
    tracing::info!(%username, %role, "Login accepted");
    Ok(User {
        username,
        role,
        email: response.email.unwrap_or_default(),
        token,
    })
}

pub async fn register(services: &Services, registration: &Registration) -> TaskboardResult<String> {
    match services.auth.email_registered(&registration.email).await {
        Ok(true) => {
            let mut errors = FieldErrors::new();
            errors.add(FormField::Email, EMAIL_TAKEN);
            return Err(TaskboardError::InvalidInput(errors));
        }
        Ok(false) => {}
        Err(err) => tracing::warn!(error = %err, "Email availability check failed"),
    }
    match services.auth.register(registration).await {
        Ok(()) => Ok(REGISTERED.to_string()),
        Err(err) if err.status() == Some(409) => Err(TaskboardError::http(409, USER_EXISTS)),
        Err(err) => Err(err),
    }
}

pub async fn forgot_password(services: &Services, request: &ForgotPassword) -> TaskboardResult<String> {
    let message = services.auth.forgot_password(request).await?;
    Ok(message.unwrap_or_else(|| RESET_LINK_SENT.to_string()))
}

pub async fn reset_password(services: &Services, request: &PasswordReset) -> TaskboardResult<String> {
    services.auth.reset_password(request).await?;
    tracing::info!("Password reset");
    Ok(PASSWORD_RESET.to_string())
}

/// Send whatever an auth form produced.
pub async fn perform(services: &Services, request: &AuthRequest) -> TaskboardResult<AuthOutcome> {
    match request {
        AuthRequest::Login(credentials) => login(services, credentials).await.map(AuthOutcome::SignedIn),
        AuthRequest::Register(registration) => {
            register(services, registration).await.map(AuthOutcome::Message)
        }
        AuthRequest::ForgotPassword(request) => {
            forgot_password(services, request).await.map(AuthOutcome::Message)
        }
        AuthRequest::ResetPassword(request) => {
            reset_password(services, request).await.map(AuthOutcome::Message)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use taskboard_domain::Role;

    use super::*;
    use crate::api::{LoginResponse, MockAuthApi};
    use crate::controllers::test_support::mock_services;
    use crate::memory::InMemoryBackend;

    fn with_auth(auth: MockAuthApi) -> Services {
        Services {
            auth: Arc::new(auth),
            ..mock_services()
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            username: "ann".into(),
            password: "password1".into(),
        }
    }

    #[tokio::test]
    async fn test_missing_token_is_an_error() {
        let mut auth = MockAuthApi::new();
        auth.expect_login().returning(|_| {
            Ok(LoginResponse {
                token: None,
                username: "ann".into(),
                role: Some(Role::User),
                email: None,
            })
        });
        let err = login(&with_auth(auth), &credentials()).await.unwrap_err();
        assert_eq!(err.user_message(), TOKEN_MISSING);
    }

    #[tokio::test]
    async fn test_register_conflict_message() {
        let mut auth = MockAuthApi::new();
        auth.expect_email_registered().returning(|_| Ok(false));
        auth.expect_register()
            .returning(|_| Err(TaskboardError::http(409, "Conflict")));
        let registration = Registration {
            username: "ann".into(),
            email: "ann@example.com".into(),
            password: "password1".into(),
        };
        let err = register(&with_auth(auth), &registration).await.unwrap_err();
        assert_eq!(err.user_message(), USER_EXISTS);
    }

    #[tokio::test]
    async fn test_taken_email_blocks_registration() {
        let mut auth = MockAuthApi::new();
        auth.expect_email_registered().returning(|_| Ok(true));
        auth.expect_register().never();
        let registration = Registration {
            username: "ann".into(),
            email: "ann@example.com".into(),
            password: "password1".into(),
        };
        let err = register(&with_auth(auth), &registration).await.unwrap_err();
        assert_eq!(err.field_errors().unwrap().get(FormField::Email), Some(EMAIL_TAKEN));
    }

    #[tokio::test]
    async fn test_full_recovery_flow() {
        let backend = Arc::new(InMemoryBackend::new());
        let services = Services::in_memory(backend.clone());

        let registration = Registration {
            username: "ann".into(),
            email: "ann@example.com".into(),
            password: "password1".into(),
        };
        assert_eq!(register(&services, &registration).await.unwrap(), REGISTERED);

        let sent = forgot_password(
            &services,
            &ForgotPassword {
                email: "ann@example.com".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(sent, "Password reset link sent to your email");

        let token = backend.reset_token_for("ann@example.com").unwrap();
        let outcome = perform(
            &services,
            &AuthRequest::ResetPassword(PasswordReset {
                token,
                new_password: "new-password1".into(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(outcome, AuthOutcome::Message(PASSWORD_RESET.to_string()));

        let user = login(
            &services,
            &Credentials {
                username: "ann".into(),
                password: "new-password1".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(user.role, Role::User);
        assert!(!user.token.is_empty());
    }
}
