use super::{parse_features, parse_schema, RequestBuilder, WfsOperation};
use crate::config::ResolvedConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{ResourceDescriptor, Row};
use crate::table::TabularData;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Fetches WFS responses over HTTP and hands the bodies to the parsers.
///
/// Network failures and non-success statuses surface as `TransportError` before
/// any parsing happens, so an empty result always means the server returned no data.
#[derive(Debug, Clone)]
pub struct WfsClient {
    requests: RequestBuilder,
    http: reqwest::Client,
}

impl WfsClient {
    pub fn new(requests: RequestBuilder, http: reqwest::Client) -> Self {
        Self { requests, http }
    }

    /// Builds a client for `config.geoserver_location` with the configured timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns `UrlError` for an invalid endpoint, or `TransportError` if the HTTP
    /// client cannot be constructed.
    pub fn from_config(config: &ResolvedConfig) -> AppResult<Self> {
        let requests = RequestBuilder::new(&config.geoserver_location)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self::new(requests, http))
    }

    pub fn request_builder(&self) -> &RequestBuilder {
        &self.requests
    }

    /// Performs a GET request and returns the response body.
    pub async fn fetch(&self, url: &Url) -> AppResult<Vec<u8>> {
        let response = self
            .http
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| AppError::TransportError(format!("Failed to fetch {url}: {e}")))?;

        let status = response.status();
        let response = response.error_for_status().map_err(|e| {
            AppError::TransportError(format!(
                "HTTP {}: Failed to fetch {url}: {e}",
                status.as_u16()
            ))
        })?;

        let body = response.bytes().await?;
        info!(
            url = url.as_str(),
            status = status.as_u16(),
            bytes = body.len(),
            "Fetched WFS response"
        );
        Ok(body.to_vec())
    }

    /// Fetches the features of `resource` as rows, capped at `max_features` when positive.
    pub async fn get_tabular_data(
        &self,
        resource: &ResourceDescriptor,
        max_features: u32,
    ) -> AppResult<Vec<Row>> {
        let url =
            self.requests
                .build_request(WfsOperation::GetFeature, &resource.type_name, max_features);
        let body = self.fetch(&url).await?;
        parse_features(&body)
    }

    /// Fetches the attribute names of `resource` from its feature type schema.
    pub async fn describe_tabular_data(
        &self,
        resource: &ResourceDescriptor,
    ) -> AppResult<Vec<String>> {
        let url = self.requests.build_request(
            WfsOperation::DescribeFeatureType,
            &resource.type_name,
            0,
        );
        let body = self.fetch(&url).await?;
        parse_schema(&body, &resource.display_name)
    }

    /// Fetches rows and column names concurrently and pairs them into a table.
    pub async fn fetch_table(
        &self,
        resource: &ResourceDescriptor,
        max_features: u32,
    ) -> AppResult<TabularData> {
        let (rows, columns) = futures::future::try_join(
            self.get_tabular_data(resource, max_features),
            self.describe_tabular_data(resource),
        )
        .await?;

        info!(
            type_name = resource.type_name.as_str(),
            columns = columns.len(),
            rows = rows.len(),
            "Fetched tabular data"
        );
        Ok(TabularData::new(columns, rows))
    }
}
