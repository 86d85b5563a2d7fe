//! Native scatter-map viewer.
//!
//! Usage: atlas-viewer --data points.json --thumbnails ./thumbs
//!        atlas-viewer --data https://host/points.json --headless-frames 600

mod app;
mod fetch;
mod headless;
mod paint;
mod search;

use std::fmt;
use std::path::PathBuf;

use clap::Parser;
use foundation::ids::PointId;
use formats::loader::{DatasetLoadError, DatasetOptions, load_dataset_from_path, parse_dataset_bytes};
use render::config::{ConfigError, EngineConfig};
use scene::dataset::Dataset;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "atlas-viewer", about = "Pan and zoom thousands of image thumbnails on a 2D map")]
struct Args {
    /// Dataset JSON: a file path or an http(s) URL.
    #[arg(long, default_value = "points.json")]
    data: String,

    /// Thumbnail directory or URL prefix (overrides the config file).
    #[arg(long)]
    thumbnails: Option<String>,

    /// Engine config JSON; missing keys use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Maximum simultaneous thumbnail fetches.
    #[arg(long)]
    max_concurrent: Option<usize>,

    /// Multiplier applied to dataset coordinates.
    #[arg(long)]
    world_scale: Option<f64>,

    /// Run this many frames without a window, then print metrics.
    #[arg(long)]
    headless_frames: Option<u64>,

    /// Fly to this point id at startup (headless runs only).
    #[arg(long)]
    focus: Option<u32>,

    /// Log filter, e.g. `info,streaming=debug`. Defaults to RUST_LOG.
    #[arg(long)]
    log: Option<String>,
}

#[derive(Debug)]
enum AppError {
    Config(ConfigError),
    Dataset(DatasetLoadError),
    Runtime(std::io::Error),
    Ui(eframe::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "config: {err}"),
            AppError::Dataset(err) => write!(f, "dataset: {err}"),
            AppError::Runtime(err) => write!(f, "async runtime: {err}"),
            AppError::Ui(err) => write!(f, "window: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Dataset(err) => Some(err),
            AppError::Runtime(err) => Some(err),
            AppError::Ui(err) => Some(err),
        }
    }
}

fn main() {
    let args = Args::parse();
    let filter = match &args.log {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = real_main(args) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn real_main(args: Args) -> Result<(), AppError> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from_path(path).map_err(AppError::Config)?,
        None => EngineConfig::default(),
    };
    if let Some(base) = &args.thumbnails {
        config.thumbnails.base = base.clone();
    }
    if let Some(n) = args.max_concurrent {
        config.scheduler.max_concurrent = n;
    }
    if let Some(scale) = args.world_scale {
        config.dataset.world_scale = scale;
    }
    let config = config.normalized();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    let dataset = load_dataset(&runtime, &args.data, &config.dataset).map_err(AppError::Dataset)?;
    tracing::info!(
        points = dataset.len(),
        thumbnails = %config.thumbnails.base,
        max_concurrent = config.scheduler.max_concurrent,
        "dataset ready"
    );

    if let Some(frames) = args.headless_frames {
        headless::run(
            dataset,
            &config,
            runtime.handle().clone(),
            frames,
            [args.width, args.height],
            args.focus.map(PointId),
        );
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([args.width as f32, args.height as f32])
            .with_title("Atlas"),
        ..Default::default()
    };
    let handle = runtime.handle().clone();
    let size = [args.width, args.height];
    eframe::run_native(
        "Atlas",
        options,
        Box::new(move |cc| Ok(Box::new(app::AtlasApp::new(cc, dataset, &config, handle, size)))),
    )
    .map_err(AppError::Ui)
}

fn load_dataset(
    runtime: &tokio::runtime::Runtime,
    source: &str,
    options: &DatasetOptions,
) -> Result<Dataset, DatasetLoadError> {
    if !(source.starts_with("http://") || source.starts_with("https://")) {
        return load_dataset_from_path(source, options);
    }
    let bytes = runtime.block_on(async {
        let response = reqwest::get(source)
            .await
            .map_err(|e| DatasetLoadError::Http(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(DatasetLoadError::Http(format!("{source} returned {status}")));
        }
        response
            .bytes()
            .await
            .map_err(|e| DatasetLoadError::Http(e.to_string()))
    })?;
    parse_dataset_bytes(&bytes, options)
}
