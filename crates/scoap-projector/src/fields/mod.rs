//! Field mappers: one pure function per legacy-record field.
//!
//! Every mapper reads an [`scoap_core::Article`] and nothing else, so the
//! record is the same whichever backend produced the aggregate.

mod abstracts;
mod authors;
mod copyright;
mod files;
mod identifiers;
mod imprints;
mod license;
mod pages;
mod publication;
mod titles;

pub use abstracts::abstracts;
pub use authors::authors;
pub use copyright::copyright;
pub use files::{file_entry, files};
pub use identifiers::{arxiv_eprints, dois};
pub use imprints::imprints;
pub use license::license;
pub use pages::{page_nr, parse_page_number};
pub use publication::{collections, publication_info};
pub use titles::titles;
