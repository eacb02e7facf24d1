//! WFS 2.0 requests and response parsing.
//!
//! [`RequestBuilder`] turns a layer name into a `GetFeature` or `DescribeFeatureType`
//! URL, [`WfsClient`] fetches it, and [`parse_features`] / [`parse_schema`] turn the
//! response bodies into rows and column names.

mod client;
mod feature_parser;
mod request;
mod schema_parser;
mod xml_reader;

// Re-export public API
pub use client::WfsClient;
pub use feature_parser::parse_features;
pub use request::{RequestBuilder, WfsOperation};
pub use schema_parser::parse_schema;
