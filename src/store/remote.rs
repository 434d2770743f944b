use std::time::Duration;

use anyhow::{Result, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::store::persistence::Persistence;

/// Remote key/value store: `GET`/`PUT`/`DELETE <base>/<key>` with JSON bodies.
pub struct HttpStore {
    base_url: String,
    client: Client,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url)
    }
}

impl Persistence for HttpStore {
    fn save(&self, key: &str, value: &str) -> Result<()> {
        let response = self
            .client
            .put(self.url(key))
            .header("Content-Type", "application/json")
            .body(value.to_string())
            .send()?;
        if !response.status().is_success() {
            bail!("PUT {key} failed: {}", response.status());
        }
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>> {
        let response = self.client.get(self.url(key)).send()?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.text()?)),
            status => bail!("GET {key} failed: {status}"),
        }
    }

    fn remove(&self, key: &str) -> Result<()> {
        let response = self.client.delete(self.url(key)).send()?;
        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            bail!("DELETE {key} failed: {status}");
        }
        Ok(())
    }
}
