//! Business logic and storage access.

pub mod aggregation;
pub mod application;
pub mod auth;
pub mod counselor;
pub mod dashboard;
pub mod period;
pub mod report;
pub mod stats;
pub mod user;
