use crate::constants::{DEFAULT_GEOSERVER_LOCATION, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::errors::{AppError, AppResult};
use crate::models::ResourceDescriptor;
use crate::table::OutputFormat;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

/// Resolved service configuration with all values filled in (no Options).
///
/// Deserialized from the `[service]` table of a config file; missing keys take
/// their defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// Base URL of the GeoServer instance; `/ows` is appended per request
    pub geoserver_location: String,
    /// Maximum number of features per GetFeature request; 0 means no `count` parameter
    pub max_features: u32,
    /// Timeout in seconds for each HTTP request
    pub request_timeout_secs: u64,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            geoserver_location: DEFAULT_GEOSERVER_LOCATION.to_string(),
            max_features: 0,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: format!("wfs-table/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ResolvedConfig {
    /// Checks that the endpoint is an absolute URL and the timeout is positive.
    pub fn validate(&self) -> AppResult<()> {
        Url::parse(&self.geoserver_location).map_err(|e| {
            AppError::InvalidInput(format!(
                "Invalid geoserver_location '{}': {e}",
                self.geoserver_location
            ))
        })?;
        if self.request_timeout_secs == 0 {
            return Err(AppError::InvalidInput(
                "Request timeout must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration that can be loaded from a TOML file.
///
/// ```toml
/// type_name = "geonode:roads"
/// name = "roads"
/// format = "json"
///
/// [service]
/// geoserver_location = "https://demo.geonode.org/geoserver"
/// max_features = 50
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolvedConfigFile {
    /// Workspace-qualified layer name sent as `typeName`
    pub type_name: String,
    /// Bare layer name used to find `<name>Type` in the schema
    pub name: String,
    /// Output format: `"text"` (default) or `"json"`
    #[serde(default)]
    pub format: OutputFormat,
    /// Service settings; defaults apply when the table is omitted
    #[serde(default)]
    pub service: ResolvedConfig,
}

impl ResolvedConfigFile {
    /// Loads and validates configuration from a TOML file.
    ///
    /// Rejects unknown keys to prevent typos from being silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read, and `InvalidInput` if the TOML
    /// is malformed, required fields are missing, unknown keys are present, the
    /// endpoint is not a URL or the timeout is zero.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ResolvedConfigFile = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;

        if config.type_name.trim().is_empty() {
            return Err(AppError::InvalidInput("type_name must not be empty".into()));
        }
        config.service.validate()?;

        Ok(config)
    }

    pub fn descriptor(&self) -> ResourceDescriptor {
        ResourceDescriptor::new(self.type_name.as_str(), self.name.as_str())
    }
}
