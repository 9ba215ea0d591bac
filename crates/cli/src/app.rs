//! Wiring shared by every command: config, API client, mounted session.

use std::sync::Arc;

use {
    anyhow::{Result, bail},
    taskdesk_api::ApiClient,
    taskdesk_auth::{CredentialStore, SessionContext},
    taskdesk_common::UserProfile,
    taskdesk_config::TaskdeskConfig,
    taskdesk_routing::{Navigation, Route, resolve},
};

pub struct App {
    pub config: TaskdeskConfig,
    pub client: ApiClient,
    pub session: Arc<SessionContext>,
}

impl App {
    /// Build the client and mount a session from the stored credentials.
    pub fn mount(config: TaskdeskConfig) -> Result<Self> {
        let credentials = CredentialStore::from_config(&config.storage)?;
        Self::with_credentials(config, credentials)
    }

    pub fn with_credentials(config: TaskdeskConfig, credentials: CredentialStore) -> Result<Self> {
        let client = ApiClient::new(&config.api)?;
        let session = Arc::new(SessionContext::mount(credentials, Arc::new(client.clone())));
        Ok(Self {
            config,
            client,
            session,
        })
    }

    /// Mount and resolve the stored session.
    pub async fn connect(config: TaskdeskConfig) -> Result<Self> {
        let app = Self::mount(config)?;
        app.session.resolve().await;
        Ok(app)
    }

    pub fn navigate(&self, path: &str) -> Navigation {
        let state = self.session.state();
        resolve(
            path,
            state.loading(),
            state.user(),
            &self.config.admin_url(),
        )
    }

    /// The signed-in user, if the route guard lets them open `route`.
    pub fn require(&self, route: Route) -> Result<UserProfile> {
        match self.navigate(route.path()) {
            Navigation::Render(_) => match self.session.user() {
                Some(user) => Ok(user),
                None => bail!("not signed in; run `taskdesk auth login`"),
            },
            Navigation::Redirect(Route::Login) => match self.session.user() {
                None => bail!("not signed in; run `taskdesk auth login`"),
                Some(user) => bail!("{} accounts cannot open {route}", user.role.label()),
            },
            other => bail!("cannot open {route}: {other:?}"),
        }
    }

    /// The signed-in user's home dashboard, if the role has one.
    pub fn home(&self) -> Result<Route> {
        match self.navigate("/") {
            Navigation::Redirect(Route::Login) | Navigation::Wait => match self.session.user() {
                Some(user) => bail!("{} accounts have no dashboard here", user.role.label()),
                None => bail!("not signed in; run `taskdesk auth login`"),
            },
            Navigation::Redirect(route) => Ok(route),
            other => bail!("no home dashboard: {other:?}"),
        }
    }
}
