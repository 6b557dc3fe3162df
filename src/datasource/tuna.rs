//! HTTP client for the upstream position data provider.

use super::{DataSource, DataSourceError};
use crate::domain::{Market, Pool, RawPosition, TokenMeta};
use async_trait::async_trait;
use backoff::future::retry;
use backoff::ExponentialBackoff;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Every endpoint wraps its payload in `{ "data": … }`.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Data source backed by the provider's public REST API.
#[derive(Debug, Clone)]
pub struct TunaApiSource {
    client: Client,
    base_url: String,
}

impl TunaApiSource {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// GET a path and unwrap the `data` envelope, retrying transient failures.
    ///
    /// 429, 5xx and network errors are transient; other non-2xx statuses and
    /// parse failures are permanent.
    async fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T, DataSourceError> {
        let url = format!("{}{}", self.base_url, path);
        let backoff = ExponentialBackoff {
            max_elapsed_time: Some(Duration::from_secs(30)),
            ..Default::default()
        };

        retry(backoff, || async {
            let response = self.client.get(&url).send().await.map_err(|e| {
                backoff::Error::transient(DataSourceError::NetworkError(e.to_string()))
            })?;

            let status = response.status();
            if status == 429 {
                return Err(backoff::Error::transient(DataSourceError::RateLimited));
            }
            if status.is_server_error() {
                return Err(backoff::Error::transient(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Server error".to_string(),
                }));
            }
            if !status.is_success() {
                return Err(backoff::Error::permanent(DataSourceError::HttpError {
                    status: status.as_u16(),
                    message: "Client error".to_string(),
                }));
            }

            response
                .json::<Envelope<T>>()
                .await
                .map(|envelope| envelope.data)
                .map_err(|e| backoff::Error::permanent(DataSourceError::ParseError(e.to_string())))
        })
        .await
    }
}

#[async_trait]
impl DataSource for TunaApiSource {
    async fn fetch_pool(&self, address: &str) -> Result<Pool, DataSourceError> {
        debug!("Fetching pool {}", address);
        self.get_data(&format!("/pools/{}", address)).await
    }

    async fn fetch_markets(&self) -> Result<Vec<Market>, DataSourceError> {
        debug!("Fetching market dataset");
        self.get_data("/markets").await
    }

    async fn fetch_token(&self, mint: &str) -> Result<TokenMeta, DataSourceError> {
        debug!("Fetching token metadata {}", mint);
        self.get_data(&format!("/mints/{}", mint)).await
    }

    async fn fetch_positions(&self, wallet: &str) -> Result<Vec<RawPosition>, DataSourceError> {
        debug!("Fetching positions for wallet {}", wallet);
        let values: Vec<serde_json::Value> = self
            .get_data(&format!("/users/{}/tuna-positions", wallet))
            .await?;
        Ok(parse_positions(values))
    }
}

/// Parse position entries one by one so a single malformed element degrades
/// to a warning instead of failing the whole wallet fetch.
fn parse_positions(values: Vec<serde_json::Value>) -> Vec<RawPosition> {
    let mut positions = Vec::with_capacity(values.len());
    for value in values {
        match serde_json::from_value::<RawPosition>(value) {
            Ok(position) => positions.push(position),
            Err(e) => {
                warn!("Failed to parse position entry: {}", e);
            }
        }
    }
    positions
}
