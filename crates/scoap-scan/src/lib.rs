//! Full-text compliance scanning.
//!
//! [`ComplianceScanner`] reads every file attached to an article through a
//! [`scoap_core::source::FileStorage`], extracts its text page by page and
//! looks for a required phrase, tolerating line breaks and irregular
//! whitespace. A file that cannot be read or parsed is skipped; it never
//! fails the scan.

mod extract;
mod normalize;
mod scanner;
mod storage;

pub mod error;

pub use error::{Error, Result};
pub use extract::{attachment_pages, is_pdf};
pub use normalize::{collapse_whitespace, contains_phrase};
pub use scanner::{ComplianceScanner, DEFAULT_PHRASE, ScanReport};
pub use storage::LocalFileStorage;

#[cfg(test)]
mod tests;
