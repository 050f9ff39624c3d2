//! SQLite backends for the SCOAP article platform.
//!
//! [`SqliteStore`] is the normalized relational store; [`SqliteDocumentIndex`]
//! mirrors it as one flattened search document per article. Both wrap
//! [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime, and both implement
//! [`scoap_core::source::ArticleSource`].

mod encode;
mod index;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use index::SqliteDocumentIndex;
pub use store::{NewArticle, SqliteStore};
