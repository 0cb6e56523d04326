//! Core building blocks: error taxonomy, access guard, navigation

pub mod auth;
pub mod error;
pub mod menu;

pub use auth::{AuthContext, AuthPolicy, AuthProvider, Role, Subject, TokenRegistry, guard};
pub use error::{EstateError, EstateResult};
pub use menu::{MenuItem, menu_for};
