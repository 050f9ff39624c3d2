use scoap_core::Article;

/// `page_nr`: the integer `page_end` of every publication-info row whose
/// `page_end` is made only of ASCII digits. Other values are skipped.
pub fn page_nr(article: &Article) -> Vec<u64> {
  article
    .publication_info
    .iter()
    .filter_map(|p| p.page_end.as_deref().and_then(parse_page_number))
    .collect()
}

/// Parse a page number that is a plain non-negative integer.
pub fn parse_page_number(s: &str) -> Option<u64> {
  if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  s.parse().ok()
}

#[cfg(test)]
mod tests {
  use scoap_core::article::PublicationInfo;

  use super::*;
  use crate::test_helpers::bare_article;

  #[test]
  fn only_digit_strings_are_pages() {
    assert_eq!(parse_page_number("27"), Some(27));
    assert_eq!(parse_page_number("007"), Some(7));
    assert_eq!(parse_page_number(""), None);
    assert_eq!(parse_page_number("N/A"), None);
    assert_eq!(parse_page_number("-3"), None);
    assert_eq!(parse_page_number("+3"), None);
    assert_eq!(parse_page_number(" 12"), None);
    assert_eq!(parse_page_number("12a"), None);
    assert_eq!(parse_page_number("99999999999999999999999"), None);
  }

  #[test]
  fn malformed_page_ends_are_skipped() {
    let mut a = bare_article();
    a.publication_info = ["15", "N/A", "", "8"]
      .into_iter()
      .map(|end| PublicationInfo { page_end: Some(end.into()), ..PublicationInfo::default() })
      .chain([PublicationInfo::default()])
      .collect();
    assert_eq!(page_nr(&a), vec![15, 8]);
  }
}
