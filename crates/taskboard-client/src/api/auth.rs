use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use taskboard_core::TaskboardResult;
use taskboard_domain::{Credentials, ForgotPassword, PasswordReset, Registration, Role};

use super::AuthApi;
use crate::http::ApiClient;

/// Body of a successful `POST /api/v1/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub username: String,
    /// Absent from some deployments; the token's claims are consulted then.
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub email: Option<String>,
}

pub struct RemoteAuthService {
    client: ApiClient,
}

impl RemoteAuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for RemoteAuthService {
    async fn login(&self, credentials: &Credentials) -> TaskboardResult<LoginResponse> {
        self.client.post("/api/v1/login", credentials).await
    }

    async fn email_registered(&self, email: &str) -> TaskboardResult<bool> {
        let existing: serde_json::Value = self
            .client
            .get_with_query("/api/v1/register", &[("email", email)])
            .await?;
        Ok(existing.as_array().is_some_and(|users| !users.is_empty()))
    }

    async fn register(&self, registration: &Registration) -> TaskboardResult<()> {
        self.client
            .post_for_message("/api/v1/register", registration)
            .await?;
        tracing::info!(username = %registration.username, "Registered account");
        Ok(())
    }

    async fn forgot_password(&self, request: &ForgotPassword) -> TaskboardResult<Option<String>> {
        self.client
            .post_for_message("/api/v1/forgot-password", request)
            .await
    }

    async fn reset_password(&self, request: &PasswordReset) -> TaskboardResult<Option<String>> {
        self.client
            .post_for_message("/api/v1/reset-password", request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_response_tolerates_missing_fields() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"username":"ann","role":"admin"}"#).unwrap();
        assert_eq!(response.token, None);
        assert_eq!(response.role, Some(Role::Admin));
    }

    #[test]
    fn test_login_response_without_role() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"token":"t","username":"ann"}"#).unwrap();
        assert_eq!(response.role, None);
    }
}
