//! Endpoint paths. These are fixed by the server and not negotiable.

pub mod auth {
    pub const LOGIN: &str = "/api/auth/login/";
    pub const INFO: &str = "/api/auth/info/";
}

pub mod users {
    pub const ALL: &str = "/api/auth/users/";
    pub const CREATE: &str = "/api/auth/users/create/";

    pub fn update(id: i64) -> String {
        format!("/api/auth/users/{id}/update/")
    }

    pub fn delete(id: i64) -> String {
        format!("/api/auth/users/{id}/delete/")
    }

    pub fn reset_password(id: i64) -> String {
        format!("/api/auth/users/{id}/reset-password/")
    }
}

pub mod tasks {
    pub const DASHBOARD: &str = "/api/dashboard/";
    pub const ALL: &str = "/api/tasks/";
    pub const CREATE: &str = "/api/tasks/create/";
    pub const HISTORY: &str = "/api/tasks/history/";
    pub const COMMENTS: &str = "/api/tasks/comments/";

    pub fn detail(id: i64) -> String {
        format!("/api/tasks/{id}/")
    }

    pub fn comments(id: i64) -> String {
        format!("/api/tasks/{id}/comments/")
    }
}
