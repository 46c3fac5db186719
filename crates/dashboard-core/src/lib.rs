//! Core types and trait definitions for the country dashboard service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends, upstream clients and the HTTP layer all depend on it and
//! meet each other only through the traits declared here.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod dashboard;
pub mod error;
pub mod event;
pub mod registration;
pub mod store;
pub mod subscriber;
pub mod upstream;

pub use error::{Error, Result};
