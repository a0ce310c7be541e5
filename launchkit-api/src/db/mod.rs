//! Database access layer for launchkit-api
//!
//! One module per entity. Functions are generic over the sqlx executor
//! so the same operation runs against the pool or inside a transaction.

pub mod activity;
pub mod approvals;
pub mod notifications;
pub mod projects;
pub mod sessions;
pub mod users;
