//! Attribute lookup for clicked locations.

use crate::{core::geo::Point, traits::AttributeFetcher, MapError, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// One record from the lookup service. The service owns the schema; the
/// viewer only knows a handful of field names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeRecord {
    fields: Map<String, Value>,
}

impl AttributeRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Field rendered for display. Missing, `null`, `false`, `0` and empty
    /// strings count as absent.
    pub fn display_value(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Decodes a lookup response body: a JSON array whose first element, if
/// any, is the record.
pub fn parse_lookup_response(body: &[u8]) -> Result<Option<AttributeRecord>> {
    let records: Vec<AttributeRecord> = serde_json::from_slice(body)?;
    Ok(records.into_iter().next())
}

/// [`AttributeFetcher`] that queries `GET {endpoint}?X={x}&Y={y}`.
#[derive(Debug, Clone)]
pub struct HttpAttributeFetcher {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpAttributeFetcher {
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_timeout(endpoint, None)
    }

    /// `timeout` of `None` keeps the transport default
    pub fn with_timeout(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            MapError::Config(format!("invalid attribute endpoint '{}': {}", endpoint, e))
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint,
            client: builder.build()?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Request URL for a clicked coordinate
    pub fn lookup_url(&self, coordinate: Point) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("X", &coordinate.x.to_string())
            .append_pair("Y", &coordinate.y.to_string());
        url
    }
}

#[async_trait]
impl AttributeFetcher for HttpAttributeFetcher {
    async fn fetch(&self, coordinate: Point) -> Result<Option<AttributeRecord>> {
        if !coordinate.is_finite() {
            return Err(MapError::InvalidCoordinates(format!(
                "{}, {}",
                coordinate.x, coordinate.y
            )));
        }

        let url = self.lookup_url(coordinate);
        log::debug!("attribute lookup {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MapError::Http {
                status: status.as_u16(),
                url: url.into(),
            });
        }

        let body = response.bytes().await?;
        parse_lookup_response(&body)
    }
}
