//! Core types, trait definitions and services for the campus leave workflow.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`store::LeaveStore`] and [`directory::Directory`]; the
//! services in [`workflow`], [`routing`], [`synthesizer`] and [`ledger`] are
//! generic over them.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod directory;
pub mod enrollment;
pub mod error;
pub mod ledger;
pub mod notice;
pub mod notification;
pub mod request;
pub mod routing;
pub mod store;
pub mod synthesizer;
pub mod workflow;

pub use error::{Error, Result};
