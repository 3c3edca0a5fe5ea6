//! Errors reported by the library and the command line tool

use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::projection::MAX_ZOOM;

#[derive(Debug, Error)]
pub enum Error {
    #[error("the minimum zoom {min_zoom} is larger than the maximum zoom {max_zoom}")]
    ZoomOrder { min_zoom: u8, max_zoom: u8 },

    #[error("zoom level {0} is larger than the supported maximum of {max}", max = MAX_ZOOM)]
    ZoomTooLarge(u8),

    #[error("the buffer size must be a finite number of at least 0, got {0}")]
    BufferSize(f64),

    #[error("the suffix must not be empty")]
    EmptySuffix,

    #[error("invalid bounding box {0:?}, expected \"min_lon,min_lat,max_lon,max_lat\"")]
    BoundingBox(String),

    #[error("neither a bounding box nor a geometry file was given")]
    NothingToDo,

    #[error("could not open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read GeoJSON")]
    GeoJson(#[from] geojson::Error),

    #[error("ran out of memory while storing {candidates} candidate tiles")]
    Allocation {
        candidates: u64,
        #[source]
        source: TryReserveError,
    },

    #[error("a worker thread stopped unexpectedly")]
    Worker,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("could not write json")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "message-pack")]
    #[error("could not write message pack")]
    MessagePack(#[from] rmp_serde::encode::Error),
}

/// Reasons for skipping a single input feature
#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("unsupported geometry type {0}")]
    Unsupported(&'static str),

    #[error("feature without geometry")]
    Empty,

    #[error("invalid position {0:?}")]
    Coordinate(Vec<f64>),
}
