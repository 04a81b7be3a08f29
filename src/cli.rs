//! Command-line interface definitions for the IJGIS feed harvester.
//!
//! All arguments are optional. Flags override values from the YAML config
//! file, which in turn overrides the built-in defaults.

use clap::Parser;

/// Command-line arguments for the IJGIS feed harvester.
///
/// # Examples
///
/// ```sh
/// # Write ./feed.xml using the built-in defaults
/// ijgis_feed
///
/// # Write elsewhere, harvesting at most 10 entries
/// ijgis_feed -o /var/www/ijgis.xml --max-items 10
///
/// # Use a config file
/// ijgis_feed -c ./ijgis.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the RSS file to write (overwritten on every run)
    #[arg(short, long, env = "IJGIS_FEED_OUTPUT", default_value = "feed.xml")]
    pub output: String,

    /// Optional path to a YAML config file
    #[arg(short, long, env = "IJGIS_FEED_CONFIG")]
    pub config: Option<String>,

    /// Maximum number of listing entries to harvest
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,
}
