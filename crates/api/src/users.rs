use {
    secrecy::{ExposeSecret, Secret},
    tracing::{info, warn},
};

use crate::{
    ApiClient, ApiError, Result, paths,
    types::{DirectoryUser, NewUser, PasswordBody, PasswordResetReply, UserUpdate, UsersEnvelope},
};

/// Minimum length the server accepts for a reset password.
pub const MIN_RESET_PASSWORD_LEN: usize = 6;

impl ApiClient {
    pub async fn list_users(&self) -> Result<Vec<DirectoryUser>> {
        let envelope: UsersEnvelope = self.get(paths::users::ALL).await?;
        Ok(envelope.users)
    }

    /// Like [`list_users`](Self::list_users), but a failure is logged and
    /// yields an empty directory so listing pages keep rendering.
    pub async fn load_users(&self) -> Vec<DirectoryUser> {
        self.list_users().await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to load users");
            Vec::new()
        })
    }

    pub async fn create_user(&self, user: &NewUser) -> Result<DirectoryUser> {
        user.validate()?;
        info!(email = %user.email, role = %user.role, "creating user");
        self.post(paths::users::CREATE, user).await
    }

    pub async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<DirectoryUser> {
        info!(id, "updating user");
        self.put(&paths::users::update(id), update).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        info!(id, "deleting user");
        self.delete(&paths::users::delete(id)).await
    }

    /// Set a new password. The server only lets users reset their own.
    pub async fn reset_password(
        &self,
        id: i64,
        password: &Secret<String>,
    ) -> Result<PasswordResetReply> {
        let raw = password.expose_secret();
        if raw.is_empty() {
            return Err(ApiError::validation("Password is required"));
        }
        if raw.chars().count() < MIN_RESET_PASSWORD_LEN {
            return Err(ApiError::validation(format!(
                "Password must be at least {MIN_RESET_PASSWORD_LEN} characters long"
            )));
        }
        info!(id, "resetting password");
        self.post(&paths::users::reset_password(id), &PasswordBody { password: raw })
            .await
    }
}
