//! REST client for the task-assignment API.
//!
//! One [`ApiClient`] is shared by everything that talks to the server. It owns
//! the bearer slot: whatever token is set there is attached to every request.

pub mod auth;
pub mod client;
pub mod error;
pub mod listing;
pub mod paths;
pub mod tasks;
pub mod types;
pub mod users;

pub use {
    client::ApiClient,
    error::{ApiError, Result},
    listing::{Page, TaskFilter, UserFilter, paginate},
    types::{
        Assignee, CommentPage, DashboardStats, DirectoryUser, FollowComment, HistoryEntry,
        LoginRequest, LoginResponse, NewTask, NewUser, Pagination, PasswordResetReply, Task,
        TaskHistory, TaskUpdate, UserUpdate,
    },
};
