use clap::{Args, Parser, Subcommand};
use roadtiles::{Pipeline, PipelineConfig, RoadTilesError, init_logging};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// JSON pipeline config; defaults are used for missing fields
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// override the configured zoom level
    #[arg(long, global = true, value_name = "int")]
    zoom: Option<u8>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// list the vector and raster urls of every tile in the region
    Tiles,
    /// fetch tiles into the local cache
    Download(Download),
    /// build training pairs from cached tiles and write them to Parquet
    Process(Process),
    /// download everything, then process
    Run,
}

#[derive(Args)]
struct Download {
    /// only download vector tiles
    #[arg(long)]
    vectors: bool,

    /// only download raster tiles
    #[arg(long)]
    rasters: bool,
}

#[derive(Args)]
struct Process {
    /// print every label matrix as 0/1 text
    #[arg(long)]
    print: bool,
}

fn load_config(cli: &Cli) -> Result<PipelineConfig, RoadTilesError> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(zoom) = cli.zoom {
        config = config.zoom_level(zoom);
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), RoadTilesError> {
    init_logging();

    let cli = Cli::parse();
    let pipeline = Pipeline::with_http(load_config(&cli)?)?;

    match &cli.command {
        Commands::Tiles => {
            let config = pipeline.config();
            for tile in pipeline.tiles()?.iter() {
                println!(
                    "{}\t{}\t{}",
                    tile,
                    config.vector_source.url_for(tile),
                    config.raster_source.url_for(tile)
                );
            }
        }
        Commands::Download(args) => {
            // Neither flag means both.
            let both = !args.vectors && !args.rasters;
            if args.vectors || both {
                pipeline.download_vectors()?;
            }
            if args.rasters || both {
                pipeline.download_rasters()?;
            }
        }
        Commands::Process(args) => {
            let pairs = pipeline.process()?;
            if args.print {
                for pair in &pairs {
                    println!("{}", pair.tile());
                    print!("{}", pair.label().to_ascii());
                }
            }
        }
        Commands::Run => {
            let summary = pipeline.run()?;
            info!(
                tiles = summary.tiles,
                pairs = summary.pairs,
                vector_failures = summary.vectors.failed.len(),
                raster_failures = summary.rasters.failed.len(),
                output = %summary.output_path.display(),
                "done"
            );
        }
    }

    Ok(())
}
