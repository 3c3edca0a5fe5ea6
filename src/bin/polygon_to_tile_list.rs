use std::error::Error as StdError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{info, warn};
use tile_list::error::Error;
use tile_list::finder::IntersectingTilesFinder;
use tile_list::formats::Format;
use tile_list::geometry::primitives::Boundary;
use tile_list::geometry::BBox;
use tile_list::projection::WebMercator;
use tile_list::source::GeoJsonSource;
use tile_list::threading::ParallelFinder;
use tile_list::{bbox_tiles, find_tiles, Config};

/// List the map tiles intersecting a bounding box or some geometries
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Geographic bounding box "min_lon,min_lat,max_lon,max_lat" whose tiles are listed as they are
    #[clap(short, long, allow_hyphen_values = true)]
    bbox: Option<String>,

    /// GeoJSON file containing the polygons and lines to find tiles for
    #[clap(short, long)]
    geom: Option<PathBuf>,

    /// Appended to every tile in text output, e.g. ".png"
    #[clap(short, long)]
    suffix: Option<String>,

    /// Lowest zoom level
    #[clap(short = 'z', long, default_value_t = 0)]
    minzoom: u8,

    /// Highest zoom level
    #[clap(short = 'Z', long, default_value_t = 14)]
    maxzoom: u8,

    /// Grow the geometries by this many meters
    #[clap(short = 'B', long, default_value_t = 0.0)]
    buffer_size: f64,

    /// File to write to instead of stdout
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Log progress and measurements
    #[clap(short, long)]
    verbose: bool,

    /// Output format
    #[clap(value_enum, short, long, default_value_t = Default::default())]
    format: Format,

    /// Whether touching a tile counts as intersecting it
    #[clap(value_enum, long, default_value_t = Default::default())]
    boundary: Boundary,

    /// Number of worker threads used for geometries
    #[clap(short, long, default_value_t = 1)]
    threads: usize,
}

fn main() -> ExitCode {
    let args = Args::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "warn" }),
    )
    .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("ERROR: {error}");
            let mut source = StdError::source(&error);
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = StdError::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let Args {
        bbox,
        geom,
        suffix,
        minzoom,
        maxzoom,
        buffer_size,
        output,
        verbose,
        format,
        boundary,
        threads,
    } = args;

    // Check everything before doing any work
    let suffix = match suffix {
        Some(suffix) if suffix.is_empty() => return Err(Error::EmptySuffix),
        Some(suffix) => {
            if !suffix.starts_with('.') {
                warn!("The suffix {suffix:?} doesn't start with a '.'");
            }
            suffix
        }
        None => String::new(),
    };
    let config = Config {
        min_zoom: minzoom,
        max_zoom: maxzoom,
        buffer: buffer_size,
        boundary,
        verbose,
    };
    config.validate()?;
    let bbox = bbox.map(|bbox| bbox.parse::<BBox>()).transpose()?;
    if bbox.is_none() && geom.is_none() {
        return Err(Error::NothingToDo);
    }

    let mut writer: BufWriter<Box<dyn Write>> = BufWriter::new(match &output {
        Some(path) => Box::new(File::create(path).map_err(|source| Error::Open {
            path: path.clone(),
            source,
        })?),
        None => Box::new(io::stdout().lock()),
    });

    {
        let finder = match geom {
            Some(path) => Some(find(config, GeoJsonSource::open(path)?, threads)?),
            None => None,
        };

        // Tiles of the bounding box come first
        let spanned = bbox
            .map(|bbox| bbox_tiles(bbox, minzoom, maxzoom))
            .transpose()?
            .into_iter()
            .flatten();
        let intersecting = finder.iter().flat_map(|finder| finder.tiles());
        format.write(&mut writer, spanned.chain(intersecting), &suffix)?;

        if let Some(mut finder) = finder {
            info!("Found {} tiles intersecting the geometries", finder.len());
            finder.release();
        }
    }

    writer.flush()?;
    Ok(())
}

fn find(
    config: Config,
    source: GeoJsonSource,
    threads: usize,
) -> Result<IntersectingTilesFinder<WebMercator>, Error> {
    if threads <= 1 {
        return find_tiles(config, WebMercator, source);
    }

    let mut finder = ParallelFinder::new(config, WebMercator, threads)?;
    finder.find_intersections(source)?;
    let finder = finder.finish()?;
    if config.verbose {
        finder.measurements().print();
    }
    Ok(finder)
}
