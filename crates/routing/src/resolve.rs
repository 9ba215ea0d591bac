use {
    taskdesk_common::UserProfile,
    tracing::debug,
};

use crate::{
    guard::{Guard, decide},
    route::{Route, home_for, normalize},
};

/// Outcome of navigating to a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    /// Session still resolving.
    Wait,
    Redirect(Route),
    /// Leave the client for another site.
    External(String),
    NotFound(String),
}

/// Resolve `path` for the current session state.
///
/// `admin_url` is where `/admin` and everything below it is sent.
pub fn resolve(
    path: &str,
    loading: bool,
    user: Option<&UserProfile>,
    admin_url: &str,
) -> Navigation {
    let path = normalize(path);

    if path == "/admin" || path.starts_with("/admin/") {
        debug!(path, target = admin_url, "redirecting to admin interface");
        return Navigation::External(admin_url.to_string());
    }

    if path == "/" {
        if loading {
            return Navigation::Wait;
        }
        let home = user.and_then(reachable_home).unwrap_or(Route::Login);
        return Navigation::Redirect(home);
    }

    let Ok(route) = path.parse::<Route>() else {
        return Navigation::NotFound(path.to_string());
    };

    let Some(allowed) = route.allowed_roles() else {
        // Only the login page is public; a signed-in user is sent home.
        if !loading
            && let Some(home) = user.and_then(reachable_home)
        {
            return Navigation::Redirect(home);
        }
        return Navigation::Render(route);
    };

    match decide(loading, user, &allowed) {
        Guard::Wait => Navigation::Wait,
        Guard::Render => Navigation::Render(route),
        Guard::RedirectToLogin => {
            debug!(path, "route guard redirected to login");
            Navigation::Redirect(Route::Login)
        },
    }
}

/// The user's home route, if its guard would let them in.
fn reachable_home(user: &UserProfile) -> Option<Route> {
    let home = home_for(&user.role)?;
    let admitted = match home.allowed_roles() {
        Some(allowed) => decide(false, Some(user), &allowed) == Guard::Render,
        None => true,
    };
    admitted.then_some(home)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    const ADMIN_URL: &str = "http://127.0.0.1:8000/api/admin/";

    fn user(role: &str) -> UserProfile {
        serde_json::from_value(serde_json::json!({
            "id": 1, "email": "u@college.edu", "role": role
        }))
        .unwrap()
    }

    #[rstest]
    #[case("/admin")]
    #[case("/admin/")]
    #[case("/admin/auth/user/")]
    fn admin_paths_leave_the_client(#[case] path: &str) {
        assert_eq!(
            resolve(path, true, None, ADMIN_URL),
            Navigation::External(ADMIN_URL.into())
        );
    }

    #[test]
    fn admin_panel_is_not_the_admin_interface() {
        let u = user("admin");
        assert_eq!(
            resolve("/admin-panel/users", false, Some(&u), ADMIN_URL),
            Navigation::Render(Route::AdminUsers)
        );
    }

    #[rstest]
    #[case(Some("hod"), Route::HodDashboard)]
    #[case(Some("Head of Department"), Route::HodDashboard)]
    #[case(Some("Staff"), Route::AdminDashboard)]
    #[case(Some("faculty"), Route::Login)]
    #[case(Some("visitor"), Route::Login)]
    #[case(None, Route::Login)]
    fn root_sends_each_role_home(#[case] role: Option<&str>, #[case] expected: Route) {
        let u = role.map(user);
        assert_eq!(
            resolve("/", false, u.as_ref(), ADMIN_URL),
            Navigation::Redirect(expected)
        );
    }

    #[test]
    fn root_waits_while_loading() {
        assert_eq!(resolve("/", true, None, ADMIN_URL), Navigation::Wait);
    }

    #[test]
    fn login_page_redirects_signed_in_users() {
        let u = user("hod");
        assert_eq!(
            resolve("/login", false, Some(&u), ADMIN_URL),
            Navigation::Redirect(Route::HodDashboard)
        );
        assert_eq!(
            resolve("/login", false, None, ADMIN_URL),
            Navigation::Render(Route::Login)
        );
        assert_eq!(
            resolve("/login", true, Some(&u), ADMIN_URL),
            Navigation::Render(Route::Login)
        );
    }

    #[test]
    fn faculty_on_login_page_is_not_bounced() {
        let faculty = user("faculty");
        assert_eq!(
            resolve("/login", false, Some(&faculty), ADMIN_URL),
            Navigation::Render(Route::Login)
        );
        assert_eq!(
            resolve("/faculty/dashboard", false, Some(&faculty), ADMIN_URL),
            Navigation::Redirect(Route::Login)
        );
    }

    #[test]
    fn guarded_routes_follow_the_guard() {
        let hod = user("hod");
        assert_eq!(
            resolve("/hod/dashboard", false, Some(&hod), ADMIN_URL),
            Navigation::Render(Route::HodDashboard)
        );
        assert_eq!(
            resolve("/admin-panel/tasks", false, Some(&hod), ADMIN_URL),
            Navigation::Redirect(Route::Login)
        );
        assert_eq!(
            resolve("/faculty/assign", true, None, ADMIN_URL),
            Navigation::Wait
        );
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(
            resolve("/reports", false, None, ADMIN_URL),
            Navigation::NotFound("/reports".into())
        );
    }
}
