use caption_bar::catalog::{self, CatalogError};
use caption_bar::config::{self, CaptionConfig};
use caption_bar::imaging::{RenderParams, SystemFonts};
use caption_bar::{captions, naming, output, render};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let release = env!("CAPTION_BAR_RELEASE");
    if release == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("CAPTION_BAR_GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "caption-bar")]
#[command(about = "Overlay auto-fitted caption bars onto batches of photographs")]
#[command(long_about = "\
Overlay auto-fitted caption bars onto batches of photographs

Images are picked at random from a directory, center-cropped to a square,
resized to the canvas, and stacked under a bar holding one caption each.
Captions are word-wrapped; the font shrinks until the caption fits.

  images/                       captions.txt
  ├── dawn.jpg                  the strongest steel is forged in the hottest fire
  ├── harbor.png                keep going
  └── notes.txt  (ignored)

  output/
  └── batch-001/
      ├── captioned_dawn.jpg
      └── captioned_harbor.png

Only .jpg, .jpeg and .png files are used (case-sensitive). Each run writes to
a new batch-NNN directory.

Run 'caption-bar gen-config' to generate a documented caption-bar.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (default: ./caption-bar.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug diagnostics (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Directory of source images
    #[arg(long)]
    images: PathBuf,

    /// Text file with one caption per line
    #[arg(long)]
    captions: PathBuf,

    /// Root directory for batch output
    #[arg(long, default_value = "output")]
    output: PathBuf,

    /// Number of images to caption (default: one per caption)
    #[arg(long)]
    count: Option<usize>,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    yes: bool,

    /// Seed the image shuffle for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Write report.json into the batch directory
    #[arg(long)]
    report: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Caption a batch of images
    Render(RenderArgs),
    /// Validate inputs without rendering
    Check {
        /// Directory of source images
        #[arg(long)]
        images: PathBuf,

        /// Text file with one caption per line
        #[arg(long)]
        captions: Option<PathBuf>,
    },
    /// Print a stock caption-bar.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Render(args) => {
            let config = load_config(cli.config.as_deref())?;
            run_render(&config, &args)?;
        }
        Command::Check {
            images,
            captions: caption_file,
        } => {
            let eligible = catalog::list_eligible(&images)?;
            let caption_count = match caption_file {
                Some(path) => Some(captions::read_captions(&path)?.len()),
                None => None,
            };
            output::print_check_output(&images, &eligible, caption_count);
            if eligible.is_empty() {
                return Err(CatalogError::EmptyCatalog(images).into());
            }
            if let Some(path) = cli.config {
                config::load_config(&path)?;
                println!("Config: {} is valid", path.display());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

fn run_render(config: &CaptionConfig, args: &RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let all = captions::read_captions(&args.captions)?;
    let count = args.count.unwrap_or(all.len());
    let selected = captions::take_captions(all, count)?;
    let needed = if args.count.is_some() { count } else { 1 };
    catalog::ensure_enough_images(&args.images, needed)?;

    output::print_captions(&selected);
    if !args.yes && !confirm("Do these caption(s) work for you?")? {
        println!("Aborted, nothing rendered");
        return Ok(());
    }

    let params = RenderParams::from_config(config)?;
    let fonts = SystemFonts::new(&config.fonts.search_dirs);
    let output_dir = naming::create_unique_output_dir(&args.output)?;
    let mut rng: Box<dyn RngCore> = match args.seed {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    };

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            for line in output::format_render_event(&event) {
                println!("{}", line);
            }
        }
    });
    let result = render::run(
        &args.images,
        &selected,
        &fonts,
        &params,
        &output_dir,
        &mut *rng,
        Some(tx),
    );
    printer
        .join()
        .map_err(|_| "output printer thread panicked")?;
    let report = result?;

    let report_path = if args.report {
        Some(render::write_report(&report, &output_dir)?)
    } else {
        None
    };
    output::print_render_summary(&report, &output_dir, report_path.as_deref());
    Ok(())
}

/// Explicit `--config` file, or `caption-bar.toml` in the working directory.
fn load_config(path: Option<&Path>) -> Result<CaptionConfig, config::ConfigError> {
    match path {
        Some(path) => config::load_config(path),
        None => config::load_config_or_default(Path::new(".")),
    }
}

/// Diagnostics go to stderr so they never interleave with the printed report.
fn init_tracing(verbose: bool) {
    let default = if verbose { "caption_bar=debug" } else { "caption_bar=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
