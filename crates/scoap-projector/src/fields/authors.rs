use scoap_core::{
  Article,
  article::{Affiliation, Author},
};

use crate::record::{LegacyAffiliation, LegacyAuthor};

/// `authors`: one entry per author, in author order.
///
/// `orcid` is present only when the author has an ORCID identifier, `ror`
/// only when the affiliation has a ROR identifier. The first one wins when
/// there are several.
pub fn authors(article: &Article) -> Vec<LegacyAuthor> {
  article.authors.iter().map(author).collect()
}

fn author(a: &Author) -> LegacyAuthor {
  LegacyAuthor {
    affiliations: a.affiliations.iter().map(affiliation).collect(),
    email:        a.email.clone(),
    full_name:    a.full_name.clone(),
    given_names:  a.first_name.clone(),
    surname:      a.last_name.clone(),
    orcid:        a.orcid().map(str::to_owned),
  }
}

fn affiliation(af: &Affiliation) -> LegacyAffiliation {
  LegacyAffiliation {
    country:      af.country.as_ref().map(|c| c.name.clone()),
    organization: af.organization.clone(),
    value:        af.value.clone(),
    ror:          af.ror().map(str::to_owned),
  }
}

#[cfg(test)]
mod tests {
  use scoap_core::{
    article::{AuthorIdentifier, Country, InstitutionIdentifier},
    identifier::{AuthorIdentifierType, InstitutionIdentifierType},
  };
  use serde_json::json;

  use super::*;
  use crate::test_helpers::bare_article;

  fn article_with(authors_in: Vec<Author>) -> Article {
    let mut a = bare_article();
    a.authors = authors_in;
    a
  }

  #[test]
  fn names_map_to_legacy_keys() {
    let a = article_with(vec![Author {
      first_name: Some("Ada".into()),
      last_name: Some("Byron".into()),
      full_name: Some("Byron, Ada".into()),
      email: Some("ada@example.org".into()),
      ..Author::default()
    }]);
    let value = serde_json::to_value(authors(&a)).unwrap();
    assert_eq!(value, json!([{
      "affiliations": [],
      "email": "ada@example.org",
      "full_name": "Byron, Ada",
      "given_names": "Ada",
      "surname": "Byron"
    }]));
  }

  #[test]
  fn orcid_key_present_only_with_an_orcid() {
    let a = article_with(vec![
      Author {
        identifiers: vec![
          AuthorIdentifier {
            identifier_type:  AuthorIdentifierType::InspireId,
            identifier_value: "INSPIRE-00123".into(),
          },
          AuthorIdentifier {
            identifier_type:  AuthorIdentifierType::Orcid,
            identifier_value: "0000-0002-1825-0097".into(),
          },
        ],
        ..Author::default()
      },
      Author {
        identifiers: vec![AuthorIdentifier {
          identifier_type:  AuthorIdentifierType::InspireId,
          identifier_value: "INSPIRE-00456".into(),
        }],
        ..Author::default()
      },
    ]);
    let value = serde_json::to_value(authors(&a)).unwrap();
    assert_eq!(value[0]["orcid"], "0000-0002-1825-0097");
    assert!(value[1].get("orcid").is_none());
  }

  #[test]
  fn ror_key_present_only_with_a_ror() {
    let a = article_with(vec![Author {
      affiliations: vec![
        Affiliation {
          value:        Some("CERN".into()),
          organization: Some("CERN".into()),
          country:      Some(Country { code: "CH".into(), name: "Switzerland".into() }),
          identifiers:  vec![InstitutionIdentifier {
            identifier_type:  InstitutionIdentifierType::Ror,
            identifier_value: "https://ror.org/01ggx4157".into(),
          }],
        },
        Affiliation {
          value:       Some("Elsewhere".into()),
          identifiers: vec![InstitutionIdentifier {
            identifier_type:  InstitutionIdentifierType::Grid,
            identifier_value: "grid.1.2".into(),
          }],
          ..Affiliation::default()
        },
      ],
      ..Author::default()
    }]);
    let value = serde_json::to_value(authors(&a)).unwrap();
    let affiliations = &value[0]["affiliations"];
    assert_eq!(affiliations[0], json!({
      "country": "Switzerland",
      "organization": "CERN",
      "value": "CERN",
      "ror": "https://ror.org/01ggx4157"
    }));
    assert!(affiliations[1].get("ror").is_none());
    assert_eq!(affiliations[1]["country"], serde_json::Value::Null);
  }
}
