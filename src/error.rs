//! Error types for font loading, GPU resource creation, and rendering.

use std::path::PathBuf;

use thiserror::Error;

/// The font source could not be read or decoded.
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed font document {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    #[error("failed to decode atlas image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Only local paths and `file://` URLs are loadable.
    #[error("unsupported font URL scheme in {0:?}")]
    UnsupportedScheme(String),

    /// A `file://` URL that names no local path, e.g. one with a remote host.
    #[error("file URL {0:?} does not name a local path")]
    NonLocalFileUrl(String),
}

/// The font document parsed but its contents are missing or inconsistent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FontFormatError {
    #[error("font document schema error: {0}")]
    Schema(String),

    #[error("font has no glyphs")]
    EmptyGlyphTable,

    #[error("metric `{name}` must be finite and positive, got {value}")]
    InvalidMetric { name: &'static str, value: f32 },

    #[error("glyph code point {0:#x} is not a valid character")]
    InvalidCodepoint(u32),

    #[error("unsupported atlas type {0:?}")]
    UnsupportedAtlasType(String),

    #[error("glyph {ch:?} has plane bounds or atlas bounds but not both")]
    MismatchedBounds { ch: char },

    #[error("glyph {ch:?} atlas bounds lie outside the {width}x{height} atlas")]
    AtlasBoundsOutOfRange { ch: char, width: u32, height: u32 },

    #[error(
        "atlas image is {actual_width}x{actual_height} but the document declares {width}x{height}"
    )]
    AtlasSizeMismatch {
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },
}

/// A GPU allocation would exceed the device limits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GpuResourceError {
    #[error("texture {width}x{height} exceeds the device limit of {limit}")]
    TextureTooLarge { width: u32, height: u32, limit: u32 },

    #[error("buffer of {size} bytes exceeds the device limit of {limit}")]
    BufferTooLarge { size: u64, limit: u64 },
}

/// Any failure from [`crate::TextRenderer::create_font`].
#[derive(Debug, Error)]
pub enum FontError {
    #[error(transparent)]
    Load(#[from] FontLoadError),

    #[error(transparent)]
    Format(#[from] FontFormatError),

    #[error(transparent)]
    Gpu(#[from] GpuResourceError),
}

/// The render target does not match the formats the pipeline was built for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderTargetError {
    #[error("render target color format {actual:?} does not match pipeline format {expected:?}")]
    ColorFormat {
        expected: wgpu::TextureFormat,
        actual: wgpu::TextureFormat,
    },

    #[error("render target depth format {actual:?} does not match pipeline depth format {expected:?}")]
    DepthFormat {
        expected: Option<wgpu::TextureFormat>,
        actual: Option<wgpu::TextureFormat>,
    },
}

/// Configuration file could not be read or parsed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
