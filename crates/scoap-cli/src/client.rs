//! Async HTTP client for the Crossref works API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, StatusCode};
use scoap_export::crossref::{WorksSelector, dois_from_listing, works_query};
use serde_json::Value;

/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct CrossrefClient {
  client:   Client,
  base_url: String,
}

impl CrossrefClient {
  pub fn new(base_url: &str, mailto: Option<&str>) -> Result<Self> {
    let agent = match mailto {
      Some(m) => format!("scoap/{} (mailto:{m})", env!("CARGO_PKG_VERSION")),
      None => format!("scoap/{}", env!("CARGO_PKG_VERSION")),
    };
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .user_agent(agent)
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.trim_end_matches('/').to_owned() })
  }

  /// `GET /works/{doi}`: the work's `message` object, or `None` when
  /// Crossref does not know the DOI.
  pub async fn work(&self, doi: &str) -> Result<Option<Value>> {
    let url = format!("{}/works/{doi}", self.base_url);
    let resp = self
      .client
      .get(&url)
      .send()
      .await
      .with_context(|| format!("GET {url} failed"))?;

    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !resp.status().is_success() {
      return Err(anyhow!("GET {url} → {}", resp.status()));
    }
    let mut body: Value = resp.json().await.context("deserialising work")?;
    Ok(body.get_mut("message").map(Value::take))
  }

  /// `GET /works?query...`: DOIs of the first page of matching works.
  pub async fn list_dois(
    &self,
    selector: &WorksSelector,
    from: Option<&str>,
    until: Option<&str>,
  ) -> Result<Vec<String>> {
    let url = format!("{}/works", self.base_url);
    let resp = self
      .client
      .get(&url)
      .query(&works_query(selector, from, until))
      .send()
      .await
      .with_context(|| format!("GET {url} failed"))?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET {url} → {}", resp.status()));
    }
    let body: Value = resp.json().await.context("deserialising works listing")?;
    Ok(dois_from_listing(&body))
  }
}
