use std::{fmt, str::FromStr};

use taskdesk_common::Role;

use crate::Error;

/// Every page of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    HodDashboard,
    AdminDashboard,
    AdminUsers,
    AdminTasks,
    AdminCreateTask,
    FacultyDashboard,
    FacultyAssign,
}

impl Route {
    pub const ALL: [Route; 8] = [
        Route::Login,
        Route::HodDashboard,
        Route::AdminDashboard,
        Route::AdminUsers,
        Route::AdminTasks,
        Route::AdminCreateTask,
        Route::FacultyDashboard,
        Route::FacultyAssign,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::HodDashboard => "/hod/dashboard",
            Self::AdminDashboard => "/admin-panel/dashboard",
            Self::AdminUsers => "/admin-panel/users",
            Self::AdminTasks => "/admin-panel/tasks",
            Self::AdminCreateTask => "/admin-panel/create-task",
            Self::FacultyDashboard => "/faculty/dashboard",
            Self::FacultyAssign => "/faculty/assign",
        }
    }

    /// Roles allowed to render this route. `None` means public.
    ///
    /// The faculty pages are staff tools for working with faculty, so they
    /// admit staff and admins rather than faculty accounts.
    pub fn allowed_roles(self) -> Option<Vec<Role>> {
        match self {
            Self::Login => None,
            Self::HodDashboard => Some(vec![Role::Hod]),
            Self::AdminDashboard
            | Self::AdminUsers
            | Self::AdminTasks
            | Self::AdminCreateTask
            | Self::FacultyDashboard
            | Self::FacultyAssign => Some(vec![Role::Admin, Role::Staff]),
        }
    }

    pub fn is_public(self) -> bool {
        self.allowed_roles().is_none()
    }
}

impl FromStr for Route {
    type Err = Error;

    /// Match a path, ignoring a trailing slash.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = normalize(path);
        Self::ALL
            .into_iter()
            .find(|r| r.path() == trimmed)
            .ok_or_else(|| Error::UnknownRoute(path.to_string()))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Home dashboard a role lands on after login, if it has one.
pub fn home_for(role: &Role) -> Option<Route> {
    match role {
        Role::Hod => Some(Route::HodDashboard),
        Role::Admin | Role::Staff => Some(Route::AdminDashboard),
        Role::Faculty => Some(Route::FacultyDashboard),
        Role::Other(_) => None,
    }
}

pub(crate) fn normalize(path: &str) -> &str {
    let trimmed = path.trim();
    match trimmed.trim_end_matches('/') {
        "" => "/",
        p => p,
    }
}
