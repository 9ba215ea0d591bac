//! The login form's submit path.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use {
    secrecy::{ExposeSecret, Secret},
    taskdesk_api::{ApiError, LoginRequest},
    taskdesk_common::UserProfile,
    taskdesk_routing::{Route, home_for},
    thiserror::Error,
    tracing::{info, warn},
};

use crate::SessionContext;

pub const MIN_PASSWORD_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Why a login attempt did not sign anyone in. `Display` is the text shown
/// to the user.
#[derive(Debug, Error)]
pub enum LoginError {
    #[error("{0}")]
    Validation(&'static str),

    #[error("A login is already in progress.")]
    AlreadySubmitting,

    #[error("Invalid response from server")]
    InvalidResponse,

    #[error("Error: Invalid Role")]
    InvalidRole(String),

    #[error("{}", request_message(.0))]
    Request(ApiError),

    #[error("Could not save credentials: {0}")]
    Storage(#[from] crate::Error),
}

impl LoginError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Most specific explanation of a failed login request.
fn request_message(err: &ApiError) -> String {
    match err {
        ApiError::Status {
            detail: Some(d), ..
        } => d.clone(),
        ApiError::Status {
            message: Some(m), ..
        } => m.clone(),
        ApiError::Status { status: 401, .. } => "Invalid email or password".into(),
        ApiError::Status { status: 404, .. } => "User not found".into(),
        ApiError::Timeout => "Request timeout. Please try again.".into(),
        ApiError::Connect(_) => "No internet connection".into(),
        ApiError::Transport(text) if !text.is_empty() => text.clone(),
        _ => "Login failed. Please try again.".into(),
    }
}

/// A successful login: who signed in and where they go next.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: UserProfile,
    pub destination: Route,
}

/// Trim and lower-case `email`, then check both fields. Returns the cleaned
/// email.
pub fn validate(email: &str, password: &str) -> Result<String, LoginError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(LoginError::Validation("Please enter your email."));
    }
    if !looks_like_email(&email) {
        return Err(LoginError::Validation("Please enter a valid email address."));
    }
    if password.is_empty() {
        return Err(LoginError::Validation("Please enter your password."));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(LoginError::Validation("Password is too short."));
    }
    Ok(email)
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .char_indices()
            .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Clears the in-flight flag when a submit ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct LoginFlow {
    session: Arc<SessionContext>,
    state: Mutex<LoginState>,
    in_flight: AtomicBool,
}

impl LoginFlow {
    pub fn new(session: Arc<SessionContext>) -> Self {
        Self {
            session,
            state: Mutex::new(LoginState::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> LoginState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: LoginState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Sign in. With `remember` the token survives the login session.
    ///
    /// A second submit while one is in flight is refused without contacting
    /// the server, as is input that fails validation.
    pub async fn submit(
        &self,
        email: &str,
        password: Secret<String>,
        remember: bool,
    ) -> Result<LoginOutcome, LoginError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(LoginError::AlreadySubmitting);
        }
        let _guard = InFlight(&self.in_flight);

        let result = self.attempt(email, password, remember).await;
        self.set_state(match result {
            Ok(_) => LoginState::Succeeded,
            Err(_) => LoginState::Failed,
        });
        result
    }

    async fn attempt(
        &self,
        email: &str,
        password: Secret<String>,
        remember: bool,
    ) -> Result<LoginOutcome, LoginError> {
        let email = validate(email, password.expose_secret())?;
        self.set_state(LoginState::Submitting);

        let gateway = self.session.gateway();
        let response = match gateway.login(&LoginRequest { email, password }).await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "login request failed");
                self.session.clear_user();
                return Err(LoginError::Request(e));
            },
        };

        let token = response
            .token
            .as_ref()
            .map(|t| t.expose_secret().clone())
            .filter(|t| !t.is_empty());
        let (Some(token), Some(raw_role)) = (token, response.staff_role()) else {
            warn!("login response is missing the token or role");
            self.session.clear_user();
            return Err(LoginError::InvalidResponse);
        };
        let raw_role = raw_role.to_string();

        let user = match response.profile(Secret::new(token.clone())) {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "login response has a malformed profile");
                self.session.clear_user();
                return Err(LoginError::InvalidResponse);
            },
        };

        let Some(destination) = home_for(&user.role) else {
            warn!(role = %raw_role, "login rejected for unknown role");
            self.session.clear_user();
            return Err(LoginError::InvalidRole(raw_role));
        };

        if let Err(e) = self.establish(&user, Secret::new(token), remember) {
            warn!(error = %e, "could not store the new session");
            self.session.clear_user();
            return Err(e.into());
        }

        info!(email = %user.email, role = %user.role, remember, "logged in");
        Ok(LoginOutcome { user, destination })
    }

    fn establish(
        &self,
        user: &UserProfile,
        token: Secret<String>,
        remember: bool,
    ) -> crate::Result<()> {
        self.session.credentials().set_token(&token, remember)?;
        self.session.gateway().set_bearer(token);
        self.session.update_user(user.clone())
    }
}

impl std::fmt::Debug for LoginFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginFlow")
            .field("state", &self.state())
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use std::time::Duration;

    use {
        super::*,
        crate::{
            CredentialStore, MemoryStore, SessionPhase,
            credentials::{PROFILE_KEY, TOKEN_KEY},
            gateway::AuthGateway,
            session::tests::{FakeGateway, profile},
            storage::{KeyValueStore, tests::FaultyStore},
        },
        rstest::rstest,
        taskdesk_common::Role,
    };

    struct Harness {
        durable: Arc<MemoryStore>,
        session_area: Arc<MemoryStore>,
        gateway: Arc<FakeGateway>,
        session: Arc<SessionContext>,
        flow: Arc<LoginFlow>,
    }

    fn harness(gateway: FakeGateway) -> Harness {
        let durable = Arc::new(MemoryStore::new());
        let session_area = Arc::new(MemoryStore::new());
        let gateway = Arc::new(gateway);
        let session = Arc::new(SessionContext::mount(
            CredentialStore::new(durable.clone(), session_area.clone()),
            gateway.clone(),
        ));
        let flow = Arc::new(LoginFlow::new(session.clone()));
        Harness {
            durable,
            session_area,
            gateway,
            session,
            flow,
        }
    }

    fn replying(role: &str) -> FakeGateway {
        let gateway = FakeGateway::default();
        *gateway.login_reply.lock().unwrap() = Some(serde_json::json!({
            "token": "jwt-token",
            "refresh": "refresh-token",
            "staff": {
                "id": 12,
                "name": "Kiran Das",
                "email": "kiran@college.edu",
                "role": role,
                "department": "ECE"
            }
        }));
        gateway
    }

    fn password(p: &str) -> Secret<String> {
        Secret::new(p.into())
    }

    #[rstest]
    #[case("", "pw1", "Please enter your email.")]
    #[case("   ", "pw1", "Please enter your email.")]
    #[case("not-an-email", "pw1", "Please enter a valid email address.")]
    #[case("a@b", "pw1", "Please enter a valid email address.")]
    #[case("a b@c.edu", "pw1", "Please enter a valid email address.")]
    #[case("a@b@c.edu", "pw1", "Please enter a valid email address.")]
    #[case("a@c.edu", "", "Please enter your password.")]
    #[case("a@c.edu", "pw", "Password is too short.")]
    fn validation_messages(#[case] email: &str, #[case] pw: &str, #[case] expected: &str) {
        let err = validate(email, pw).unwrap_err();
        assert_eq!(err.user_message(), expected);
    }

    #[test]
    fn validation_cleans_email() {
        assert_eq!(validate("  Ravi@College.EDU ", "abc").unwrap(), "ravi@college.edu");
    }

    #[tokio::test]
    async fn invalid_email_makes_no_request() {
        let h = harness(replying("hod"));
        let err = h
            .flow
            .submit("not-an-email", password("secret"), false)
            .await
            .unwrap_err();

        assert!(matches!(err, LoginError::Validation(_)));
        assert_eq!(h.gateway.login_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.flow.state(), LoginState::Failed);
    }

    #[rstest]
    #[case("hod", Route::HodDashboard)]
    #[case("HOD", Route::HodDashboard)]
    #[case("Head of Department", Route::HodDashboard)]
    #[case("head of department", Route::HodDashboard)]
    #[case("admin", Route::AdminDashboard)]
    #[case("Admin", Route::AdminDashboard)]
    #[case("staff", Route::AdminDashboard)]
    #[case("STAFF", Route::AdminDashboard)]
    #[case("faculty", Route::FacultyDashboard)]
    #[case("Faculty", Route::FacultyDashboard)]
    #[tokio::test]
    async fn redirects_by_role(#[case] role: &str, #[case] expected: Route) {
        let h = harness(replying(role));
        let outcome = h
            .flow
            .submit("kiran@college.edu", password("secret"), false)
            .await
            .unwrap();

        assert_eq!(outcome.destination, expected);
        assert_eq!(h.flow.state(), LoginState::Succeeded);
        assert_eq!(h.session.state().phase, SessionPhase::Confirmed);
        assert_eq!(h.gateway.bearer.lock().unwrap().as_deref(), Some("jwt-token"));
    }

    #[rstest]
    #[case("principal")]
    #[case("")]
    #[tokio::test]
    async fn unknown_role_is_rejected_and_cleared(#[case] role: &str) {
        let h = harness(replying(role));
        let err = h
            .flow
            .submit("kiran@college.edu", password("secret"), true)
            .await
            .unwrap_err();

        if role.is_empty() {
            assert!(matches!(err, LoginError::InvalidResponse));
        } else {
            assert!(matches!(err, LoginError::InvalidRole(_)));
            assert_eq!(err.user_message(), "Error: Invalid Role");
        }
        assert!(h.durable.is_empty());
        assert!(h.session_area.is_empty());
        assert!(h.session.user().is_none());
    }

    #[tokio::test]
    async fn remember_stores_token_durably_only() {
        let h = harness(replying("admin"));
        h.session_area.set(TOKEN_KEY, "previous").unwrap();

        h.flow
            .submit("kiran@college.edu", password("secret"), true)
            .await
            .unwrap();

        assert_eq!(h.durable.get(TOKEN_KEY).as_deref(), Some("jwt-token"));
        assert_eq!(h.session_area.get(TOKEN_KEY), None);
        assert!(h.durable.get(PROFILE_KEY).is_some());
    }

    #[tokio::test]
    async fn without_remember_token_is_session_scoped() {
        let h = harness(replying("staff"));
        h.durable.set(TOKEN_KEY, "previous").unwrap();

        let outcome = h
            .flow
            .submit("kiran@college.edu", password("secret"), false)
            .await
            .unwrap();

        assert_eq!(h.durable.get(TOKEN_KEY), None);
        assert_eq!(h.session_area.get(TOKEN_KEY).as_deref(), Some("jwt-token"));
        assert_eq!(outcome.user.role, Role::Staff);
        assert_eq!(outcome.user.full_name.as_deref(), Some("Kiran Das"));
        assert_eq!(outcome.user.token(), Some("jwt-token"));
    }

    #[tokio::test]
    async fn missing_token_is_an_invalid_response() {
        let gateway = FakeGateway::default();
        *gateway.login_reply.lock().unwrap() =
            Some(serde_json::json!({"staff": {"id": 1, "email": "a@c.edu", "role": "hod"}}));
        let h = harness(gateway);
        h.session
            .update_user(profile("hod").with_token(password("old")))
            .unwrap();
        h.gateway.set_bearer(password("old"));

        let err = h
            .flow
            .submit("a@c.edu", password("secret"), false)
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Invalid response from server");
        assert!(h.durable.is_empty());
        assert!(h.session_area.is_empty());
        assert!(!h.gateway.has_bearer());
        assert_eq!(h.session.state().phase, SessionPhase::Rejected);
    }

    #[tokio::test]
    async fn snapshot_write_failure_leaves_nobody_signed_in() {
        let durable = Arc::new(FaultyStore {
            fail_set: Some(PROFILE_KEY),
            ..FaultyStore::default()
        });
        let session_area = Arc::new(MemoryStore::new());
        let gateway = Arc::new(replying("admin"));
        let session = Arc::new(SessionContext::mount(
            CredentialStore::new(durable.clone(), session_area.clone()),
            gateway.clone(),
        ));
        let flow = LoginFlow::new(session.clone());

        let err = flow
            .submit("kiran@college.edu", password("secret"), false)
            .await
            .unwrap_err();

        assert!(matches!(err, LoginError::Storage(_)));
        assert_eq!(err.user_message(), "Could not save credentials: disk full");
        assert_eq!(session.state().phase, SessionPhase::Rejected);
        assert!(session.user().is_none());
        assert!(!gateway.has_bearer());
        assert!(session_area.get(TOKEN_KEY).is_none());
        assert!(durable.get(TOKEN_KEY).is_none());
        assert_eq!(flow.state(), LoginState::Failed);
    }

    #[tokio::test]
    async fn failed_request_clears_credentials() {
        let gateway = FakeGateway::default();
        *gateway.login_status.lock().unwrap() = Some(401);
        let h = harness(gateway);
        h.session
            .update_user(profile("hod").with_token(password("old")))
            .unwrap();

        let err = h
            .flow
            .submit("a@c.edu", password("wrong"), true)
            .await
            .unwrap_err();

        assert_eq!(err.user_message(), "Invalid email or password");
        assert!(h.durable.is_empty());
        assert!(h.session_area.is_empty());
        assert!(!h.gateway.has_bearer());
        assert_eq!(h.flow.state(), LoginState::Failed);
    }

    #[tokio::test]
    async fn concurrent_submit_is_refused() {
        let mut gateway = replying("hod");
        gateway.login_delay = Some(Duration::from_millis(100));
        let h = harness(gateway);

        let first = {
            let flow = h.flow.clone();
            tokio::spawn(async move {
                flow.submit("kiran@college.edu", password("secret"), false)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(h.flow.state(), LoginState::Submitting);

        let second = h
            .flow
            .submit("kiran@college.edu", password("secret"), false)
            .await;
        assert!(matches!(second, Err(LoginError::AlreadySubmitting)));

        first.await.unwrap().unwrap();
        assert_eq!(h.gateway.login_calls.load(Ordering::SeqCst), 1);

        h.flow
            .submit("kiran@college.edu", password("secret"), false)
            .await
            .unwrap();
        assert_eq!(h.gateway.login_calls.load(Ordering::SeqCst), 2);
    }

    fn status(status: u16, detail: Option<&str>, message: Option<&str>) -> ApiError {
        ApiError::Status {
            status,
            detail: detail.map(Into::into),
            message: message.map(Into::into),
            error: Some("Invalid credentials".into()),
        }
    }

    #[rstest]
    #[case(status(401, Some("Account disabled"), Some("m")), "Account disabled")]
    #[case(status(400, None, Some("Email not verified")), "Email not verified")]
    #[case(status(401, None, None), "Invalid email or password")]
    #[case(status(404, None, None), "User not found")]
    #[case(status(500, None, None), "Login failed. Please try again.")]
    #[case(ApiError::Timeout, "Request timeout. Please try again.")]
    #[case(ApiError::Connect("refused".into()), "No internet connection")]
    #[case(ApiError::Transport("redirect loop".into()), "redirect loop")]
    #[case(ApiError::Decode("eof".into()), "Login failed. Please try again.")]
    fn request_error_priority(#[case] err: ApiError, #[case] expected: &str) {
        assert_eq!(LoginError::Request(err).user_message(), expected);
    }
}
