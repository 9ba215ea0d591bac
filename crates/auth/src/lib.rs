//! Sessions and credentials for the task client.
//!
//! - [`CredentialStore`]: token and profile snapshot over durable and
//!   session-scoped key-value areas
//! - [`SessionContext`]: the signed-in user, resolved once per mount
//! - [`LoginFlow`]: credential validation, login and role-based redirect

pub mod credentials;
pub mod error;
pub mod gateway;
pub mod login;
pub mod session;
pub mod storage;

pub use {
    credentials::{CredentialStore, TokenLocation},
    error::{Error, Result},
    gateway::AuthGateway,
    login::{LoginError, LoginFlow, LoginOutcome, LoginState},
    session::{SessionContext, SessionPhase, SessionState},
    storage::{FileStore, KeyValueStore, MemoryStore},
};
