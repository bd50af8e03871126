use std::path::PathBuf;
use thiserror::Error;

/// Invalid run parameters, detected once before any walker is spawned
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Wind level outside `[0, 1/6]`
    #[error("wind_level must satisfy 0 <= wind_level <= 1/6, got {0}")]
    InvalidWindLevel(f64),

    /// Requested cluster size larger than the hexagon can hold
    #[error("nucleus_upper_limit {capacity} exceeds the {total_vertices} vertices of the lattice")]
    CapacityExceedsLattice { capacity: usize, total_vertices: u64 },

    /// Hexagon too large for `i32` axial coordinates
    #[error("mesh_length {mesh_length} exceeds the largest supported radius {max}")]
    MeshTooLarge { mesh_length: u32, max: u32 },

    #[error("nucleus_upper_limit must be at least 1")]
    ZeroCapacity,
}

/// Failures while reading or writing run artifacts (config, presets, nucleus file, images)
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to (de)serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to encode GIF: {0}")]
    Gif(#[from] gif::EncodingError),

    #[error("malformed nucleus line {line} (expected a lattice point \"x y\"): {content:?}")]
    MalformedLine { line: usize, content: String },

    #[error("could not determine config directory")]
    NoConfigDir,
}

impl PersistError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistError::Io {
            path: path.into(),
            source,
        }
    }
}
