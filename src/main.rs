use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use listing_flyer::Orientation;

#[derive(Parser, Debug)]
#[command(
    name = "listing-flyer",
    version,
    about = "Generate a printable PDF flyer with a QR code for a vehicle listing"
)]
struct Cli {
    /// Listing slug (unique listing identifier)
    #[arg(long = "slug")]
    slug: String,

    /// Page orientation: P (portrait) or L (landscape)
    #[arg(long = "orient", value_parser = parse_orientation)]
    orient: Orientation,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Directory for the generated PDF (overrides [output] dir)
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<String>,

    /// Listings JSON file (overrides [source] listings)
    #[arg(long = "source")]
    source: Option<String>,

    /// Label locale (embedded packs: en, ru)
    #[arg(short = 'l', long = "locale")]
    locale: Option<String>,

    /// Label pack TOML file (overrides --locale)
    #[arg(long = "labels")]
    labels: Option<String>,

    /// Print the draw plan as JSON instead of rendering
    #[arg(long = "emit-plan")]
    emit_plan: bool,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

fn parse_orientation(value: &str) -> Result<Orientation, String> {
    value.parse()
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    listing_flyer::logging::init(cli.verbose)?;

    let result = listing_flyer::run(listing_flyer::Config {
        slug: cli.slug,
        orientation: cli.orient,
        settings_path: cli.read_settings,
        output_dir: cli.output_dir,
        source: cli.source,
        locale: cli.locale,
        labels: cli.labels,
        emit_plan: cli.emit_plan,
    });

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("error: {}", err);
            Ok(ExitCode::from(err.exit_code() as u8))
        }
    }
}
