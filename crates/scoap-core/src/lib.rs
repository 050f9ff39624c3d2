//! Core types and trait definitions for the SCOAP article platform.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! It holds the backend-agnostic article aggregate, the flattened search
//! document shape, and the traits each storage backend implements.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod article;
pub mod document;
pub mod error;
pub mod identifier;
pub mod source;

pub use article::{Article, ArticleId};
pub use document::ArticleDocument;
pub use error::{Error, Result};
