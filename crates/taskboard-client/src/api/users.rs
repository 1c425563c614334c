use async_trait::async_trait;
use taskboard_core::TaskboardResult;
use taskboard_domain::{Profile, UserSummary};

use super::UserApi;
use crate::http::ApiClient;

pub struct RemoteUserService {
    client: ApiClient,
}

impl RemoteUserService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserApi for RemoteUserService {
    async fn profile(&self) -> TaskboardResult<Profile> {
        self.client.get("/api/v1/auth/profile").await
    }

    async fn list_users(&self) -> TaskboardResult<Vec<UserSummary>> {
        self.client.get("/api/v1/admin/users").await
    }
}
