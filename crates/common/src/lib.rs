//! Domain types shared by every taskdesk crate: user roles and profiles.

pub mod profile;
pub mod role;

pub use {profile::UserProfile, role::Role};
