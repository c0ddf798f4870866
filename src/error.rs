//! Error types for level, settings and GPU setup.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading game data or starting the renderer.
#[derive(Debug, Error)]
pub enum Error {
    /// Level file could not be read.
    #[error("failed to read level '{path}': {source}")]
    LevelRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A token in a level file is not a tile code.
    #[error("bad tile '{token}' in level '{name}' at row {row}, column {column}")]
    BadTile {
        name: String,
        row: usize,
        column: usize,
        token: String,
    },

    /// Tile code outside 0..=5.
    #[error("unknown tile code {code} in level '{name}' at row {row}, column {column}")]
    UnknownTile {
        name: String,
        row: usize,
        column: usize,
        code: u32,
    },

    /// Level file has no rows.
    #[error("level '{0}' contains no tiles")]
    EmptyLevel(String),

    /// Rows of a level file differ in width.
    #[error("level '{name}' row {row} has {actual} tiles, expected {expected}")]
    RaggedLevel {
        name: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Requested level does not exist.
    #[error("level index {index} out of range ({count} levels loaded)")]
    LevelIndex { index: usize, count: usize },

    /// Game needs at least one level.
    #[error("no levels configured")]
    NoLevels,

    /// Settings file could not be read.
    #[error("failed to read settings '{path}': {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings JSON is malformed.
    #[error("invalid settings: {0}")]
    SettingsParse(#[from] serde_json::Error),

    /// A setting is outside its allowed range.
    #[error("invalid setting '{field}': {reason}")]
    InvalidSettings { field: &'static str, reason: String },

    /// No GPU adapter matched the surface.
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    /// The adapter refused to create a device.
    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// The canvas could not back a surface.
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    /// The surface reports no texture formats for this adapter.
    #[error("surface is not supported by the adapter")]
    SurfaceUnsupported,
}
