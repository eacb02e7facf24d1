use crate::config::{ResolvedConfig, ResolvedConfigFile};
use crate::errors::{AppError, AppResult};
use crate::models::ResourceDescriptor;
use crate::table::{OutputFormat, TabularData};
use crate::wfs::WfsClient;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Builds the `wfs-table` command with its four subcommands:
/// - `features`: fetch a layer's features and print them
/// - `schema`: fetch a layer's attribute names
/// - `table`: fetch both and print the features under the schema's columns
/// - `toml`: same as `table`, driven by a TOML configuration file
pub fn build_command() -> Command<'static> {
    Command::new("wfs-table")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .subcommand(
            Command::new("features")
                .about("Fetch features with GetFeature and print them")
                .arg(type_name_arg())
                .arg(max_features_arg())
                .arg(endpoint_arg())
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("schema")
                .about("Fetch attribute names with DescribeFeatureType")
                .arg(type_name_arg())
                .arg(name_arg())
                .arg(endpoint_arg())
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("table")
                .about("Fetch features and schema, and print them as one table")
                .after_help("Example:\n  wfs-table table -t geonode:roads -n roads -m 50 -e http://localhost:8080/geoserver")
                .arg(type_name_arg())
                .arg(name_arg())
                .arg(max_features_arg())
                .arg(endpoint_arg())
                .arg(format_arg()),
        )
        .subcommand(
            Command::new("toml")
                .about("Run `table` using a TOML configuration file")
                .arg(
                    Arg::new("config")
                        .help("Path to the TOML config file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn type_name_arg() -> Arg<'static> {
    Arg::new("type_name")
        .short('t')
        .long("type-name")
        .help("Layer identifier sent as typeName (e.g. geonode:roads)")
        .required(true)
        .action(ArgAction::Set)
}

fn name_arg() -> Arg<'static> {
    Arg::new("name")
        .short('n')
        .long("name")
        .help("Layer name used to find '<name>Type' in the schema (e.g. roads)")
        .required(true)
        .action(ArgAction::Set)
}

fn max_features_arg() -> Arg<'static> {
    Arg::new("max_features")
        .short('m')
        .long("max-features")
        .help("Maximum number of features to request (0 = no limit)")
        .value_parser(clap::value_parser!(u32))
        .action(ArgAction::Set)
}

fn endpoint_arg() -> Arg<'static> {
    Arg::new("endpoint")
        .short('e')
        .long("endpoint")
        .help("GeoServer base URL (default: http://localhost:8080/geoserver)")
        .action(ArgAction::Set)
}

fn format_arg() -> Arg<'static> {
    Arg::new("format")
        .short('f')
        .long("format")
        .help("Output format: 'text' or 'json'")
        .default_value("text")
        .action(ArgAction::Set)
}

/// Parses command-line arguments and runs the selected subcommand.
///
/// # Returns
///
/// Returns `Ok(())` once the output has been written. Returns an error if:
/// - The endpoint or configuration file is invalid
/// - A request fails or returns a non-success status
/// - A response is not well-formed XML
///
pub async fn cli() -> AppResult<()> {
    let cmd = build_command();
    let mut cmd_for_help = cmd.clone();
    let matches = cmd.get_matches();

    match matches.subcommand() {
        Some((name @ ("features" | "schema" | "table"), sub)) => {
            let config = service_config(sub);
            let format = output_format(sub)?;
            let client = WfsClient::from_config(&config)?;
            let output = match name {
                "features" => {
                    let resource = resource(sub, None);
                    let rows = client
                        .get_tabular_data(&resource, config.max_features)
                        .await?;
                    TabularData::from_rows(rows).render(format)?
                }
                "schema" => {
                    let resource = resource(sub, sub.get_one::<String>("name"));
                    let columns = client.describe_tabular_data(&resource).await?;
                    render_columns(&columns, format)?
                }
                _ => {
                    let resource = resource(sub, sub.get_one::<String>("name"));
                    client
                        .fetch_table(&resource, config.max_features)
                        .await?
                        .render(format)?
                }
            };
            write_output(&output)?;
        }
        Some(("toml", sub)) => {
            let config_path = sub
                .get_one::<PathBuf>("config")
                .expect("config is required");

            let file_config = ResolvedConfigFile::from_toml_file(config_path)?;
            info!(
                config = %config_path.display(),
                type_name = file_config.type_name.as_str(),
                "Loaded configuration"
            );
            let client = WfsClient::from_config(&file_config.service)?;
            let table = client
                .fetch_table(&file_config.descriptor(), file_config.service.max_features)
                .await?;
            write_output(&table.render(file_config.format)?)?;
        }
        _ => {
            cmd_for_help
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        }
    }

    Ok(())
}

fn service_config(sub: &ArgMatches) -> ResolvedConfig {
    let mut config = ResolvedConfig::default();
    if let Some(endpoint) = sub.try_get_one::<String>("endpoint").ok().flatten() {
        config.geoserver_location = endpoint.clone();
    }
    if let Some(&max_features) = sub.try_get_one::<u32>("max_features").ok().flatten() {
        config.max_features = max_features;
    }
    config
}

fn output_format(sub: &ArgMatches) -> AppResult<OutputFormat> {
    sub.get_one::<String>("format")
        .map_or(Ok(OutputFormat::Text), |f| f.parse())
}

fn resource(sub: &ArgMatches, name: Option<&String>) -> ResourceDescriptor {
    let type_name = sub
        .get_one::<String>("type_name")
        .expect("type_name is required");
    // Without an explicit name, fall back to the part after the workspace prefix
    let display_name = name.cloned().unwrap_or_else(|| {
        type_name
            .rsplit_once(':')
            .map_or(type_name.as_str(), |(_, local)| local)
            .to_string()
    });
    ResourceDescriptor::new(type_name.as_str(), display_name)
}

fn render_columns(columns: &[String], format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Text => Ok(columns.join("\n")),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(columns)?),
    }
}

fn write_output(output: &str) -> AppResult<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{output}")?;
    out.flush()?;
    Ok(())
}
