//! wfs-table library
//!
//! This crate provides the core functionality for the `wfs-table` binary.
//! Keep the crate root minimal — implementation and tests live in their modules.
//!
//! ## Overview
//!
//! - [`wfs`] - Builds WFS 2.0 request URLs, fetches them, and parses `GetFeature`
//!   and `DescribeFeatureType` responses into rows and attribute names
//! - [`table`] - Pairs rows with column names and renders them as text or JSON
//! - [`cli`] - Command-line interface for fetching and printing a layer
//! - [`config`] - TOML configuration with the service endpoint and request settings
//! - [`models`] - Rows, resource descriptors and catalog entries
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use wfs_table::{config::ResolvedConfig, errors::AppResult, models::ResourceDescriptor, wfs::WfsClient};
//!
//! # async fn example() -> AppResult<()> {
//! let config = ResolvedConfig::default();
//! let client = WfsClient::from_config(&config)?;
//!
//! let roads = ResourceDescriptor::new("geonode:roads", "roads");
//! let table = client.fetch_table(&roads, 50).await?;
//! println!("{}", table.render_text());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod table;
pub mod wfs;
