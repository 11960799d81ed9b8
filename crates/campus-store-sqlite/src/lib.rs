//! SQLite backend for the campus leave workflow.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. One [`SqliteStore`] implements both
//! [`campus_core::store::LeaveStore`] and [`campus_core::directory::Directory`].

mod directory;
mod encode;
mod schema;
mod store;

pub mod error;
pub mod seed;

pub use error::{Error, Result};
pub use seed::HierarchySeed;
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
