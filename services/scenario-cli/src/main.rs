//! Land-cover scenario CLI.
//!
//! Reads a classification GeoTIFF and a drawing, stamps the chosen class into
//! the drawn region and writes the tile-aligned result as a GeoTIFF.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use geo_common::CrsCode;
use scenario_cli::load_drawing;
use scenario_engine::{
    decode_geotiff, GeoTiffCompression, PipelineConfig, ScenarioError, ScenarioRequest,
    ScenarioService,
};

#[derive(Parser, Debug)]
#[command(name = "scenario-cli")]
#[command(about = "Stamp a land-cover class into a drawn region of a classification GeoTIFF")]
struct Args {
    /// Source classification GeoTIFF
    #[arg(long)]
    source: PathBuf,

    /// Drawing file (JSON rings or GeoJSON)
    #[arg(long)]
    drawing: PathBuf,

    /// Land-cover class to stamp into the drawing (0-255)
    #[arg(long = "class")]
    class_value: u8,

    /// Output GeoTIFF path
    #[arg(short, long)]
    output: PathBuf,

    /// Optional path for the export metadata JSON
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Tile size the output is aligned to (overrides SCENARIO_TILE_SIZE)
    #[arg(long)]
    tile_size: Option<usize>,

    /// Projected CRS of the source, e.g. EPSG:3857 (overrides SCENARIO_CRS)
    #[arg(long)]
    crs: Option<String>,

    /// Output compression (overrides SCENARIO_COMPRESSION)
    #[arg(long, value_enum)]
    compression: Option<CompressionArg>,

    /// Log level
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Emit JSON log lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CompressionArg {
    None,
    Deflate,
}

impl From<CompressionArg> for GeoTiffCompression {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::None => Self::None,
            CompressionArg::Deflate => Self::Deflate,
        }
    }
}

impl Args {
    /// Environment configuration with command-line overrides applied.
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::from_env();

        if let Some(tile_size) = self.tile_size {
            config.tile_size = tile_size;
        }
        if let Some(crs) = &self.crs {
            config.crs = CrsCode::from_code_string(crs)?;
        }
        if let Some(compression) = self.compression {
            config.compression = compression.into();
        }

        Ok(config)
    }
}

fn init_tracing(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    if let Err(e) = run(&args).await {
        match e.downcast_ref::<ScenarioError>() {
            Some(scenario_error) => error!(
                kind = ?scenario_error.kind(),
                error = %scenario_error,
                "{}",
                scenario_error.user_message()
            ),
            None => error!(error = %e, "Scenario edit failed"),
        }
        return Err(e);
    }
    Ok(())
}

async fn run(args: &Args) -> Result<()> {
    let config = args.pipeline_config()?;
    info!(
        tile_size = config.tile_size,
        crs = %config.crs,
        compression = %config.compression,
        "Loaded configuration"
    );
    let service = ScenarioService::new(config)?;

    let bytes = tokio::fs::read(&args.source)
        .await
        .with_context(|| format!("Failed to read source raster {:?}", args.source))?;
    let source = decode_geotiff(&bytes, service.config().crs)?;
    info!(
        width = source.width(),
        height = source.height(),
        bands = source.band_count(),
        crs = %source.crs(),
        "Loaded source raster"
    );

    let drawing = load_drawing(&args.drawing)
        .with_context(|| format!("Failed to load drawing {:?}", args.drawing))?;
    info!(polygons = drawing.len(), "Loaded drawing");

    let request = ScenarioRequest::new(drawing, args.class_value);
    let output = service.submit(Arc::new(source), request).await?;

    tokio::fs::write(&args.output, &output.geotiff)
        .await
        .with_context(|| format!("Failed to write {:?}", args.output))?;
    info!(path = ?args.output, bytes = output.geotiff.len(), "Wrote scenario GeoTIFF");

    if let Some(path) = &args.metadata {
        let json = serde_json::to_vec_pretty(&output)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write {:?}", path))?;
        info!(path = ?path, "Wrote export metadata");
    }

    Ok(())
}
