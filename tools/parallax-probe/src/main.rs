//! Command-line probe for the parallax engine.
//!
//! Provides commands for:
//! - Validating a segment file
//! - Sampling computed styles across a scroll range on a static page
//! - Listing the named easing presets
//!
//! ## Usage
//!
//! ```bash
//! # Check a segment file
//! parallax-probe validate segments.json
//!
//! # One JSON line per sampled position
//! parallax-probe sample segments.json --layout page.json --step 50
//!
//! # CSS declarations instead of JSON
//! parallax-probe sample segments.json --layout page.json --css
//! ```

use clap::{Parser, Subcommand};
use parallax_common::{init_logging, LogConfig, LogFormat, ParallaxSettings};
use parallax_core::{touched_style_keys, will_change, BindingOptions, NamedEasing};
use std::path::PathBuf;

mod sample;

use sample::{load_layout, load_segments, SampleRange};

#[derive(Parser)]
#[command(name = "parallax-probe")]
#[command(about = "Validate parallax segments and sample the engine over a scroll range")]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log format (pretty, compact, json)
    #[arg(long, global = true, default_value = "compact")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a segment file
    Validate {
        /// Segment list (JSON array)
        segments: PathBuf,
    },

    /// Sample the engine at evenly spaced scroll positions
    Sample {
        /// Segment list (JSON array)
        segments: PathBuf,
        /// Static page layout (JSON)
        #[arg(short, long)]
        layout: PathBuf,
        /// Runtime settings (JSON)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// First scroll position
        #[arg(long, default_value = "0")]
        from: f64,
        /// Last scroll position (defaults to the maximum scroll)
        #[arg(long)]
        to: Option<f64>,
        /// Distance between samples
        #[arg(long, default_value = "10")]
        step: f64,
        /// Print CSS declarations instead of JSON
        #[arg(long)]
        css: bool,
        /// Only print positions where the style or classes changed
        #[arg(long)]
        changes_only: bool,
        /// Sample even while the element is outside the viewport
        #[arg(long)]
        animate_when_not_in_viewport: bool,
    },

    /// List the named easing presets
    Easings,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_config = LogConfig::default()
        .with_level_name(&cli.log_level)?
        .with_format(cli.log_format);
    init_logging(log_config)?;

    match cli.command {
        Commands::Validate { segments } => {
            let parsed = load_segments(&segments)?;
            let keys = touched_style_keys(&parsed);

            println!("{}: {} segment(s) OK", segments.display(), parsed.len());
            for (index, segment) in parsed.iter().enumerate() {
                println!(
                    "  [{}] {} ({} properties)",
                    index,
                    segment.id(index),
                    segment.properties.len()
                );
            }
            println!("  will-change: {}", will_change(&keys));
        }

        Commands::Sample {
            segments,
            layout,
            settings,
            from,
            to,
            step,
            css,
            changes_only,
            animate_when_not_in_viewport,
        } => {
            let settings = match settings {
                Some(path) => ParallaxSettings::load(path)?,
                None => ParallaxSettings::default(),
            };
            let options = BindingOptions {
                animate_when_not_in_viewport,
                ..Default::default()
            };
            let range = SampleRange { from, to, step };

            let samples = sample::sample(
                load_segments(&segments)?,
                load_layout(&layout)?,
                settings,
                options,
                range,
            )?;

            for sample in samples.iter().filter(|s| s.changed || !changes_only) {
                if css {
                    println!(
                        "{:>8} [{}] {}",
                        sample.scroll,
                        sample.class_name,
                        sample.style.to_css()
                    );
                } else {
                    println!("{}", serde_json::to_string(sample)?);
                }
            }
        }

        Commands::Easings => {
            for easing in NamedEasing::ALL {
                let [x1, y1, x2, y2] = easing.control_points();
                println!("{:<16} cubic-bezier({}, {}, {}, {})", easing.name(), x1, y1, x2, y2);
            }
        }
    }

    Ok(())
}
