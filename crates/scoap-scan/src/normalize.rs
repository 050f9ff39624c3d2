/// Collapse every run of whitespace, line breaks included, into one space
/// and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
  text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Case-sensitive search for `phrase` in `text`, both whitespace-collapsed.
pub fn contains_phrase(text: &str, phrase: &str) -> bool {
  collapse_whitespace(text).contains(&collapse_whitespace(phrase))
}
