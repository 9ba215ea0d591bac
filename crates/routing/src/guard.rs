use taskdesk_common::{Role, UserProfile};

/// What a protected route should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The session is still resolving; show a placeholder, do not redirect.
    Wait,
    RedirectToLogin,
    Render,
}

/// Decide whether `user` may render a route admitting `allowed`.
///
/// A user whose role is not allowed is sent to the login page, the same as
/// a signed-out visitor.
pub fn decide(loading: bool, user: Option<&UserProfile>, allowed: &[Role]) -> Guard {
    if loading {
        return Guard::Wait;
    }
    match user {
        None => Guard::RedirectToLogin,
        Some(u) if !allowed.contains(&u.role) => Guard::RedirectToLogin,
        Some(_) => Guard::Render,
    }
}
