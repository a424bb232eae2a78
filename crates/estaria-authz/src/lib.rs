//! ESTARIA Authz — rule-based authorization resolution.
//!
//! This crate provides:
//! - The shared permission-rule shape ([`PermissionRule`]) built from
//!   role abilities and per-user overrides
//! - A pure, storage-agnostic merge function ([`resolver::resolve`])
//!   and its list-query counterpart ([`resolver::resolve_filter`])
//! - Protected-role guards and an [`AuthzService`] generic over the
//!   `estaria-core` repository traits
//!
//! The resolver never performs I/O: rule rows are fetched by the
//! service and passed in, which keeps the decision logic unit-testable.

pub mod conditions;
pub mod config;
pub mod error;
pub mod resolver;
pub mod rule;
pub mod service;

pub use config::AuthzConfig;
pub use error::AuthzError;
pub use resolver::{AccessRequest, Decision, FilterDecision};
pub use rule::PermissionRule;
pub use service::{AuthzService, Principal};
