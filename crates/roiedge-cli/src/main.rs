//! roiedge CLI - region-of-interest edge detection from the command line.

use clap::{Args, Parser, Subcommand};
use roiedge::filter::{detect, status_code};
use roiedge::io::{ImageFormat, read_image, write_image};
use roiedge::region::{ConnectivityType, count_components};
use roiedge::session::{CannyDetector, Outcome, Session, SessionConfig, load_config};
use roiedge::{DetectionParameters, ErrorKind, PixelBuffer, PixelFormat, Rect, STATUS_OK};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

/// Gray level of the synthetic test image
const SYNTHETIC_LEVEL: u8 = 128;
/// Side of the synthetic test image
const SYNTHETIC_SIZE: u32 = 100;

#[derive(Parser)]
#[command(name = "roiedge")]
#[command(about = "Detect edges inside a region of interest of an image")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one detection through the boundary call.
    Detect(DetectArgs),

    /// Replay a threshold slider drag through a live session.
    Sweep(SweepArgs),

    /// Print the status codes of the boundary call.
    StatusCodes,
}

#[derive(Debug, Clone, Args)]
struct SourceArgs {
    /// Path to the input image (PNG, JPEG or BMP).
    #[arg(long, conflicts_with = "synthetic", required_unless_present = "synthetic")]
    image: Option<PathBuf>,

    /// Use a 100x100 mid-gray test image instead of a file.
    #[arg(long)]
    synthetic: bool,

    /// JSON session config (quiescence, default parameters).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Low hysteresis threshold (overrides the config).
    #[arg(long)]
    low: Option<f64>,

    /// High hysteresis threshold (overrides the config).
    #[arg(long)]
    high: Option<f64>,

    /// Binarization level, 0..=255 (overrides the config).
    #[arg(long)]
    level: Option<i32>,

    /// Region as x,y,width,height. Defaults to the whole image, or to
    /// 25,25,50,50 for the synthetic image.
    #[arg(long, value_parser = parse_roi)]
    roi: Option<Rect>,
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Clamp the region to the image instead of rejecting it.
    #[arg(long)]
    clamp: bool,

    /// Write the edge map as an 8-bit grayscale PNG.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct SweepArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// High thresholds to step through.
    #[arg(long, value_delimiter = ',', default_values_t = [100.0, 150.0, 200.0, 250.0])]
    highs: Vec<f64>,

    /// Delay between steps in milliseconds.
    #[arg(long, default_value = "10")]
    step_ms: u64,
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Sweep(args) => run_sweep(&args),
        Commands::StatusCodes => run_status_codes(),
    }
}

fn parse_roi(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [x, y, w, h] = parts.as_slice() else {
        return Err(format!("expected x,y,width,height, got '{s}'"));
    };
    let num = |v: &str| v.parse::<i32>().map_err(|e| format!("'{v}': {e}"));
    Ok(Rect::new(num(x)?, num(y)?, num(w)?, num(h)?))
}

fn synthetic_image() -> CliResult<PixelBuffer> {
    let mut pix = PixelBuffer::new(SYNTHETIC_SIZE, SYNTHETIC_SIZE, PixelFormat::Bgra8)?.to_mut();
    let v = SYNTHETIC_LEVEL;
    for y in 0..SYNTHETIC_SIZE {
        for px in pix.row_mut(y).chunks_exact_mut(4) {
            px.copy_from_slice(&[v, v, v, 255]);
        }
    }
    Ok(pix.into())
}

struct Source {
    image: PixelBuffer,
    roi: Rect,
    config: SessionConfig,
}

fn load_source(args: &SourceArgs) -> CliResult<Source> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SessionConfig::default(),
    };
    let params = &mut config.parameters;
    if let Some(low) = args.low {
        params.low_threshold = low;
    }
    if let Some(high) = args.high {
        params.high_threshold = high;
    }
    if let Some(level) = args.level {
        params.binarization_level = level;
    }

    let (image, default_roi) = match &args.image {
        Some(path) => {
            tracing::info!("Loading image: {}", path.display());
            let image = read_image(path)?;
            let bounds = image.bounds();
            (image, bounds)
        }
        None => (synthetic_image()?, Rect::new(25, 25, 50, 50)),
    };
    tracing::info!("Image size: {}x{}", image.width(), image.height());

    Ok(Source {
        roi: args.roi.unwrap_or(default_roi),
        image,
        config,
    })
}

// ── detect ─────────────────────────────────────────────────────────────

fn run_detect(args: &DetectArgs) -> CliResult<()> {
    let Source { image, roi, config } = load_source(&args.source)?;
    let roi = if args.clamp {
        let clamped = roi.clamp_to(image.width(), image.height());
        if clamped != roi {
            tracing::info!("Region clamped from {} to {}", roi, clamped);
        }
        clamped
    } else {
        roi
    };
    let params = config.parameters;

    let input = image.to_packed_bytes();
    let mut output = vec![0u8; roi.area().max(0) as usize];
    let start = Instant::now();
    let result = detect(
        &input,
        image.width(),
        image.height(),
        &mut output,
        &params,
        roi,
    );
    let status = status_code(&result);
    println!("status: {}", status);

    let (w, h) = match result {
        Ok(dims) => dims,
        Err(e) => return Err(format!("detection failed ({}): {}", status, e).into()),
    };
    println!("output: {}x{}", w, h);
    tracing::info!(
        "Detected in {:.2} ms (low {}, high {}, level {})",
        start.elapsed().as_secs_f64() * 1000.0,
        params.low_threshold,
        params.high_threshold,
        params.binarization_level
    );

    let edges = PixelBuffer::from_bytes(w, h, PixelFormat::Gray8, output)?;
    let pixels = edges.count_nonzero()?;
    let components = count_components(&edges, ConnectivityType::EightWay)?;
    println!("edge pixels: {}", pixels);
    println!("edge components: {}", components);

    if let Some(out) = &args.out {
        write_image(&edges, out, ImageFormat::Png)?;
        tracing::info!("Edge map written to {}", out.display());
    }
    Ok(())
}

// ── sweep ──────────────────────────────────────────────────────────────

fn run_sweep(args: &SweepArgs) -> CliResult<()> {
    let Source { image, roi, config } = load_source(&args.source)?;
    let base = config.parameters;
    let settle = config.quiescence() + Duration::from_secs(2);

    let mut session = Session::start(config, CannyDetector)?;
    let loaded = session.load_image(image)?;
    let mut last = session.set_roi(roi)?.unwrap_or(loaded);

    for &high in &args.highs {
        let params = DetectionParameters::new(base.low_threshold, high, base.binarization_level);
        if let Some(id) = session.set_parameters(params)? {
            last = id;
        }
        thread::sleep(Duration::from_millis(args.step_ms));
    }
    tracing::info!("{} edits sent, waiting for results", args.highs.len());

    let mut delivered = 0;
    while let Some(delivery) = session.recv_timeout(settle) {
        delivered += 1;
        match &delivery.outcome {
            Outcome::Success(map) => {
                let pixels = map.as_buffer().count_nonzero()?;
                println!(
                    "{}: {}x{} edge map, {} edge pixels",
                    delivery.request_id,
                    map.width(),
                    map.height(),
                    pixels
                );
            }
            Outcome::Empty => println!("{}: empty", delivery.request_id),
            Outcome::Failure { kind, message } => {
                println!(
                    "{}: failed ({}): {}",
                    delivery.request_id,
                    kind.status_code(),
                    message
                );
            }
        }
        if delivery.request_id >= last {
            break;
        }
    }
    println!(
        "deliveries: {}, stale results dropped: {}",
        delivered,
        session.dropped_count()
    );
    session.shutdown();
    Ok(())
}

// ── status-codes ───────────────────────────────────────────────────────

fn run_status_codes() -> CliResult<()> {
    println!("{:>4}  success", STATUS_OK);
    for kind in ErrorKind::ALL {
        println!("{:>4}  {:?}: {}", kind.status_code(), kind, kind);
    }
    Ok(())
}
