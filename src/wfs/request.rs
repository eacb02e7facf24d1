use crate::constants::{OWS_PATH, WFS_SERVICE, WFS_VERSION};
use crate::errors::{AppError, AppResult};
use std::fmt;
use url::Url;

/// WFS operations this crate issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WfsOperation {
    GetFeature,
    DescribeFeatureType,
}

impl WfsOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetFeature => "GetFeature",
            Self::DescribeFeatureType => "DescribeFeatureType",
        }
    }
}

impl fmt::Display for WfsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds WFS 2.0.0 request URLs against a fixed service endpoint.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    endpoint: Url,
}

impl RequestBuilder {
    /// Creates a builder for the given GeoServer base URL (e.g. `http://localhost:8080/geoserver`).
    ///
    /// # Errors
    ///
    /// Returns `UrlError` if `service_endpoint` is not an absolute `http` or `https` URL.
    pub fn new(service_endpoint: &str) -> AppResult<Self> {
        let endpoint = Url::parse(service_endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") || endpoint.cannot_be_a_base() {
            return Err(AppError::UrlError(format!(
                "service endpoint must be an http(s) URL, got '{service_endpoint}'"
            )));
        }
        Ok(Self { endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Builds `{endpoint}/ows?service=wfs&version=2.0.0&request={operation}&typeName={type_name}`,
    /// followed by `&count={max_features}` when `max_features` is positive.
    ///
    /// `type_name` is substituted literally, apart from the characters a URL query
    /// cannot carry (spaces, `#`, quotes, non-ASCII), which are percent-encoded.
    pub fn build_request(&self, operation: WfsOperation, type_name: &str, max_features: u32) -> Url {
        let mut url = self.endpoint.clone();
        let path = format!("{}/{OWS_PATH}", self.endpoint.path().trim_end_matches('/'));
        url.set_path(&path);

        let mut query = format!(
            "service={WFS_SERVICE}&version={WFS_VERSION}&request={operation}&typeName={type_name}"
        );
        if max_features > 0 {
            query.push_str(&format!("&count={max_features}"));
        }
        url.set_query(Some(&query));
        url.set_fragment(None);
        url
    }
}
