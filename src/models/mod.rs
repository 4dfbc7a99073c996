//! Database models and DTOs for all domain entities.

pub mod application;
pub mod counselor;
pub mod pagination;
pub mod user;
