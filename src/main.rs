use anyhow::Context;
use clap::{Parser, Subcommand};
use ridgeline::commands::{self, AutoMarkArgs, RenderView};
use ridgeline::annotator::calibration::DEFAULT_MIN_PEAK_DISTANCE;
use ridgeline::annotator::model::Point;
use ridgeline::settings::{default_config_path, Config};
use ridgeline::{init_logging, render_options, BUILD_DATE, VERSION};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ridgeline", version, about = "Dual-canvas forensic annotation engine")]
struct Cli {
    /// Settings file (.toml or .json); defaults to the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render an exported markings file to a PNG
    Render {
        #[arg(long)]
        markings: PathBuf,
        /// Tracing strokes to draw over the markings
        #[arg(long)]
        tracing: Option<PathBuf>,
        #[arg(long)]
        image_width: u32,
        #[arg(long)]
        image_height: u32,
        #[arg(long)]
        out: PathBuf,
        /// Canvas rotation in radians
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        rotation: f64,
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,
        #[arg(long)]
        no_labels: bool,
    },
    /// Detect minutiae with SourceAFIS and export them as ray markings
    Automark {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        image_width: u32,
        #[arg(long)]
        image_height: u32,
        #[arg(long)]
        out: PathBuf,
        /// SourceAFIS executable, overriding the configured one
        #[arg(long)]
        exe: Option<PathBuf>,
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Derive pixels per millimetre from a ruler line
    Calibrate {
        #[arg(long)]
        image: PathBuf,
        #[arg(long, value_parser = commands::parse_point)]
        from: Point,
        #[arg(long, value_parser = commands::parse_point)]
        to: Point,
        #[arg(long, default_value_t = DEFAULT_MIN_PEAK_DISTANCE)]
        min_distance: usize,
    },
    /// Write the default fingerprint marking types as JSON
    Types {
        #[arg(long)]
        out: PathBuf,
    },
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load_or_default(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    tracing::debug!("ridgeline {} (built {})", VERSION, BUILD_DATE);
    let config = load_config(cli.config)?;

    match cli.command {
        Command::Render {
            markings,
            tracing,
            image_width,
            image_height,
            out,
            rotation,
            zoom,
            no_labels,
        } => {
            let mut options = render_options(&config);
            if no_labels {
                options.show_labels = false;
            }
            commands::render_file(
                &markings,
                tracing.as_deref(),
                &out,
                image_width,
                image_height,
                RenderView { rotation, zoom },
                options,
            )?;
            println!("{}", out.display());
        }
        Command::Automark {
            image,
            image_width,
            image_height,
            out,
            exe,
            timeout_ms,
        } => {
            let args = AutoMarkArgs {
                executable: exe,
                timeout_ms,
            };
            let runtime = tokio::runtime::Runtime::new()?;
            let (document, report) = runtime.block_on(commands::automark_image(
                &config,
                &args,
                &image,
                (image_width, image_height),
            ))?;
            document.save_to_file(&out)?;
            println!(
                "{} of {} minutiae marked in {:?}",
                report.labels.len(),
                report.detected,
                report.duration
            );
        }
        Command::Calibrate {
            image,
            from,
            to,
            min_distance,
        } => {
            let reading = commands::calibrate_image(&image, from, to, min_distance)?;
            println!("{}", commands::describe_reading(&reading));
        }
        Command::Types { out } => {
            commands::write_default_types(&out)?;
            println!("{}", out.display());
        }
    }

    Ok(())
}
