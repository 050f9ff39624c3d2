//! Page text extraction. Blocking; callers run it off the async runtime.

use crate::{Error, Result};

const PDF_MAGIC: &[u8] = b"%PDF-";

pub fn is_pdf(bytes: &[u8]) -> bool { bytes.starts_with(PDF_MAGIC) }

/// The text of every page of an attachment, in page order.
///
/// PDFs yield one string per page. Anything else must be UTF-8 text and is
/// a single page.
pub fn attachment_pages(bytes: &[u8]) -> Result<Vec<String>> {
  if is_pdf(bytes) {
    return pdf_pages(bytes);
  }
  std::str::from_utf8(bytes)
    .map(|text| vec![text.to_owned()])
    .map_err(|_| Error::NotText)
}

fn pdf_pages(bytes: &[u8]) -> Result<Vec<String>> {
  let doc = lopdf::Document::load_mem(bytes)?;
  // Keyed by page number, so iteration is in page order.
  let pages = doc.get_pages();
  pages
    .keys()
    .map(|&page| doc.extract_text(&[page]).map_err(Error::from))
    .collect()
}
