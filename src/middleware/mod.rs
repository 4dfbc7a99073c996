//! Request extractors enforcing sessions and roles.

pub mod auth;
pub mod rbac;
