//! Identifier type vocabularies for articles, authors, and institutions.
//!
//! Each vocabulary has a handful of known kinds plus an `Other` escape hatch,
//! so values written by a newer schema still load instead of being dropped.
//! The wire strings are the ones stored in the database and the search index.

use serde::{Deserialize, Serialize};

macro_rules! identifier_vocabulary {
  (
    $(#[$meta:meta])*
    $name:ident { $($variant:ident => $wire:literal),+ $(,)? }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(from = "String", into = "String")]
    pub enum $name {
      $($variant,)+
      Other(String),
    }

    impl $name {
      /// The string stored in the `identifier_type` column / document field.
      pub fn as_str(&self) -> &str {
        match self {
          $(Self::$variant => $wire,)+
          Self::Other(s) => s.as_str(),
        }
      }
    }

    impl From<&str> for $name {
      fn from(s: &str) -> Self {
        match s {
          $($wire => Self::$variant,)+
          other => Self::Other(other.to_owned()),
        }
      }
    }

    impl From<String> for $name {
      fn from(s: String) -> Self { Self::from(s.as_str()) }
    }

    impl From<$name> for String {
      fn from(t: $name) -> Self { t.as_str().to_owned() }
    }

    impl std::fmt::Display for $name {
      fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
      }
    }
  };
}

identifier_vocabulary! {
  /// Kinds of persistent identifier attached to an article.
  ArticleIdentifierType {
    Doi => "DOI",
    Arxiv => "arXiv",
  }
}

identifier_vocabulary! {
  /// Kinds of identifier attached to an author.
  AuthorIdentifierType {
    Orcid => "ORCID",
    InspireId => "INSPIRE ID",
  }
}

identifier_vocabulary! {
  /// Kinds of identifier attached to an affiliation's institution.
  InstitutionIdentifierType {
    Ror => "ROR",
    Grid => "GRID",
  }
}
