//! Admin console for user records.
//!
//! The screen lives in [`state::AdminState`], a plain state machine. A
//! [`controller::Controller`] runs the backend calls it asks for through a
//! [`api::UsersApi`]; [`render`] turns the state into text.

pub mod api;
pub mod controller;
pub mod filter;
pub mod render;
pub mod state;

pub use api::{ApiError, HttpUsersApi, UsersApi};
pub use controller::Controller;
pub use state::{AdminState, Command};
