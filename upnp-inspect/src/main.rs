use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use upnp_description::{parse_max_age, DescriptionLoader, DiscoveryInfo, LoaderConfig};

mod logging;
mod render;

use logging::LoggingMode;

/// UPnP device description inspector
///
/// Fetches the description document a device advertises in its SSDP
/// `LOCATION` header and prints the resulting device tree.
#[derive(Parser, Debug)]
#[command(name = "upnp-inspect")]
#[command(about = "Fetch and display a UPnP device description")]
#[command(version)]
pub struct Args {
    /// Description location (http://, https:// or file://)
    pub location: String,

    /// Advertised max-age: seconds or a Cache-Control value
    #[arg(short = 'm', long, default_value = "1800")]
    pub max_age: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print the raw description document after the tree
    #[arg(long)]
    pub raw: bool,

    /// HTTP connect and read timeout in seconds
    #[arg(short, long, default_value = "5")]
    pub timeout: u64,

    /// Maximum device nesting accepted from the document
    #[arg(long, default_value = "16")]
    pub max_depth: usize,

    /// SERVER header of the advertisement, kept as vendor firmware
    #[arg(long)]
    pub server: Option<String>,

    /// USN of the advertisement
    #[arg(long)]
    pub usn: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl Args {
    /// Validate command line arguments
    pub fn validate(&self) -> Result<()> {
        if self.timeout == 0 {
            return Err(anyhow::anyhow!("Timeout must be positive"));
        }

        match self.log_level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => Ok(()),
            _ => Err(anyhow::anyhow!(
                "Invalid log level '{}'. Valid levels: error, warn, info, debug, trace",
                self.log_level
            )),
        }
    }

    pub fn location_url(&self) -> Result<Url> {
        Url::parse(&self.location)
            .with_context(|| format!("Invalid description location '{}'", self.location))
    }

    pub fn loader_config(&self) -> LoaderConfig {
        let timeout = Duration::from_secs(self.timeout);
        LoaderConfig::new()
            .with_timeouts(timeout, timeout)
            .with_max_depth(self.max_depth)
    }

    pub fn discovery_info(&self) -> DiscoveryInfo {
        DiscoveryInfo {
            vendor_firmware: self.server.clone(),
            usn: self.usn.clone(),
            // The UDN is the part of the USN before "::"
            udn: self
                .usn
                .as_deref()
                .map(|usn| usn.split("::").next().unwrap_or(usn).to_string()),
        }
    }
}

fn run(args: Args) -> Result<()> {
    let location = args.location_url()?;
    let max_age = parse_max_age(&args.max_age)
        .with_context(|| format!("Invalid max-age '{}'", args.max_age))?;

    let loader = DescriptionLoader::new(args.loader_config()).context("Invalid loader configuration")?;
    debug!("Loader configuration: {:?}", loader.config());

    info!("Loading device description from {}", location);
    let root = loader
        .load_with(&location, max_age, args.discovery_info())
        .with_context(|| format!("Failed to load device description from {}", location))?;
    info!(
        "Parsed {} device(s) for '{}'",
        root.devices().count(),
        root.device().friendly_name
    );

    match args.format {
        OutputFormat::Text => print!("{}", render::render_text(&root)),
        OutputFormat::Json => println!(
            "{}",
            render::render_json(&root).context("Failed to serialize device tree")?
        ),
    }

    if args.raw {
        let text = root
            .description_text()
            .context("Description document is no longer available")?;
        println!();
        println!("{}", text);
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    logging::init_logging_from_env(LoggingMode::Development, &args.log_level.to_lowercase())
        .context("Failed to initialize logging")?;

    run(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["upnp-inspect", "http://192.168.1.100:1400/xml/device_description.xml"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = args(&[]);
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.max_depth, 16);
        assert!(args.validate().is_ok());

        let config = args.loader_config();
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(&["--timeout", "0"])]
    #[case(&["--log-level", "verbose"])]
    fn test_invalid_args(#[case] extra: &[&str]) {
        assert!(args(extra).validate().is_err());
    }

    #[test]
    fn test_discovery_info_from_usn() {
        let args = args(&[
            "--usn",
            "uuid:RINCON_000E58A0123456::urn:schemas-upnp-org:device:ZonePlayer:1",
            "--server",
            "Linux UPnP/1.0 Sonos/70.3-88200 (ZPS9)",
        ]);
        let info = args.discovery_info();

        assert_eq!(info.udn.as_deref(), Some("uuid:RINCON_000E58A0123456"));
        assert_eq!(
            info.vendor_firmware.as_deref(),
            Some("Linux UPnP/1.0 Sonos/70.3-88200 (ZPS9)")
        );
    }

    #[test]
    fn test_json_format_flag() {
        assert_eq!(args(&["--format", "json"]).format, OutputFormat::Json);
    }

    #[test]
    fn test_invalid_location() {
        let args = Args::try_parse_from(["upnp-inspect", "not a url"]).unwrap();
        assert!(args.location_url().is_err());
    }
}
