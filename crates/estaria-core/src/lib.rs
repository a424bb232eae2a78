//! ESTARIA Core — domain models, repository traits, and shared error
//! types for the estaria real-estate platform backend.
//!
//! This crate has no I/O dependencies. Storage implementations live in
//! `estaria-db`; authorization resolution lives in `estaria-authz`.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{EstariaError, EstariaResult};
pub use models::user::SYSTEM_USER_ID;
