use tracing::info;

use {
    crate::{
        ApiClient, Result, paths,
        types::{LoginRequest, LoginResponse},
    },
    taskdesk_common::UserProfile,
};

impl ApiClient {
    /// Exchange credentials for a token. Does not touch the bearer slot.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        info!(email = %request.email, "logging in");
        self.post(paths::auth::LOGIN, request).await
    }

    /// Profile of whoever the current bearer token belongs to.
    pub async fn current_profile(&self) -> Result<UserProfile> {
        self.get(paths::auth::INFO).await
    }
}
