//! Client routes and role-gated navigation.
//!
//! Resolution order for a requested path:
//! 1. `/admin`, `/admin/*`: external admin interface
//! 2. `/`: the user's home dashboard, by role
//! 3. `/login`: the form, or home if already signed in
//! 4. protected routes: the [`guard`] decision for the route's allow-list
//! 5. anything else: not found

pub mod error;
pub mod guard;
pub mod resolve;
pub mod route;

pub use {
    error::{Error, Result},
    guard::{Guard, decide},
    resolve::{Navigation, resolve},
    route::{Route, home_for},
};
