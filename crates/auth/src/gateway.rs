use {
    async_trait::async_trait,
    secrecy::Secret,
    taskdesk_api::{ApiClient, LoginRequest, LoginResponse, Result as ApiResult},
    taskdesk_common::UserProfile,
};

/// The login and profile endpoints plus the shared bearer header.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse>;

    /// Profile of the current bearer token's owner.
    async fn current_profile(&self) -> ApiResult<UserProfile>;

    fn set_bearer(&self, token: Secret<String>);

    fn clear_bearer(&self);

    fn has_bearer(&self) -> bool;
}

#[async_trait]
impl AuthGateway for ApiClient {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        ApiClient::login(self, request).await
    }

    async fn current_profile(&self) -> ApiResult<UserProfile> {
        ApiClient::current_profile(self).await
    }

    fn set_bearer(&self, token: Secret<String>) {
        ApiClient::set_bearer(self, token);
    }

    fn clear_bearer(&self) {
        ApiClient::clear_bearer(self);
    }

    fn has_bearer(&self) -> bool {
        ApiClient::has_bearer(self)
    }
}
