use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// HTTP request failed, timed out, or returned a non-success status
    #[error("Transport error: {0}")]
    TransportError(String),
    /// Response body is not well-formed XML
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
    /// A matched schema element lacks a required attribute
    #[error("Element '{element}' is missing required attribute '{attribute}'")]
    AttributeMissing { element: String, attribute: String },
    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    UrlError(String),
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
}

// Conversion implementations for common errors
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AppError::TransportError(format!("HTTP {}: {err}", status.as_u16())),
            None => AppError::TransportError(err.to_string()),
        }
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::UrlError(err.to_string())
    }
}

impl From<quick_xml::Error> for AppError {
    fn from(err: quick_xml::Error) -> Self {
        AppError::MalformedDocument(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for AppError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        AppError::MalformedDocument(format!("invalid attribute: {err}"))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON serialization failed: {err}"))
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn test_attribute_missing_display() {
        let err = AppError::AttributeMissing {
            element: "element".to_string(),
            attribute: "name".to_string(),
        };

        let error_msg = err.to_string();
        assert!(error_msg.contains("'element'"));
        assert!(error_msg.contains("'name'"));
    }

    #[test]
    fn test_transport_error_display() {
        let err = AppError::TransportError("Connection timeout".to_string());
        assert!(err.to_string().contains("Transport error"));
        assert!(err.to_string().contains("Connection timeout"));
    }

    #[test]
    fn test_malformed_document_display() {
        let err = AppError::MalformedDocument("unclosed element".to_string());
        assert!(err.to_string().contains("Malformed document"));
        assert!(err.to_string().contains("unclosed element"));
    }

    #[test]
    fn test_url_error_from_parse_error() {
        let err: AppError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, AppError::UrlError(_)));
        assert!(err.to_string().contains("Invalid URL"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml");
        let err: AppError = io.into();
        assert!(matches!(err, AppError::IoError(ref msg) if msg.contains("missing.toml")));
    }

    #[test]
    fn test_app_error_implements_error_trait() {
        use std::error::Error;
        let err: Box<dyn Error> = Box::new(AppError::TransportError("test".to_string()));
        assert!(!err.to_string().is_empty());
    }
}
