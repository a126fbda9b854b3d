//! MSDF font metrics: glyph table, kerning, and atlas coordinates.
//!
//! `MsdfFont` is the CPU half of a loaded font and is all the layout engine
//! needs. The GPU half (atlas texture and bind group) lives in
//! [`crate::gpu::FontAsset`].

mod document;
mod loader;

pub use loader::{FontSource, load_font_source};

use std::collections::HashMap;
use std::path::Path;

use crate::error::{FontError, FontLoadError};

/// Advance in em for missing glyphs when the font has no space glyph.
pub const DEFAULT_FALLBACK_ADVANCE: f32 = 0.5;

/// Axis-aligned rectangle with a y-up convention (`bottom <= top`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

/// Per-glyph metrics.
///
/// `plane_bounds` is in em units relative to the pen position; `atlas_bounds`
/// is in atlas texels measured from the bottom-left corner. Both are `None`
/// for glyphs with no ink (space and friends).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphMetric {
    pub advance: f32,
    pub plane_bounds: Option<Bounds>,
    pub atlas_bounds: Option<Bounds>,
}

impl GlyphMetric {
    /// Plane and atlas bounds, when the glyph has a visible image.
    pub fn ink(&self) -> Option<(Bounds, Bounds)> {
        self.plane_bounds.zip(self.atlas_bounds)
    }
}

/// Immutable glyph table and global metrics of an MSDF font.
#[derive(Debug, Clone)]
pub struct MsdfFont {
    glyphs: HashMap<char, GlyphMetric>,
    kerning: HashMap<(char, char), f32>,
    /// Baseline-to-baseline distance in em.
    line_height: f32,
    /// Atlas pixels per em.
    em_size: f32,
    /// Distance field range in atlas pixels.
    distance_range: f32,
    ascender: f32,
    descender: f32,
    atlas_width: u32,
    atlas_height: u32,
    fallback_advance: f32,
}

impl MsdfFont {
    /// Parse an msdf-atlas-gen JSON document. `origin` names the source in
    /// error messages.
    pub fn parse(bytes: &[u8], origin: &Path) -> Result<Self, FontError> {
        let doc = document::FontDocument::parse(bytes, origin)?;
        Ok(doc.into_font()?)
    }

    pub fn glyph(&self, ch: char) -> Option<&GlyphMetric> {
        self.glyphs.get(&ch)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Kerning adjustment in em between `left` and `right` (0 when unpaired).
    pub fn kerning(&self, left: char, right: char) -> f32 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0.0)
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn em_size(&self) -> f32 {
        self.em_size
    }

    pub fn distance_range(&self) -> f32 {
        self.distance_range
    }

    pub fn ascender(&self) -> f32 {
        self.ascender
    }

    pub fn descender(&self) -> f32 {
        self.descender
    }

    pub fn atlas_size(&self) -> (u32, u32) {
        (self.atlas_width, self.atlas_height)
    }

    /// Advance in em used for characters the font does not cover.
    pub fn fallback_advance(&self) -> f32 {
        self.fallback_advance
    }

    /// Replace the advance used for uncovered characters.
    #[must_use]
    pub fn with_fallback_advance(mut self, advance: f32) -> Self {
        self.fallback_advance = advance;
        self
    }

    /// Normalized texture coordinates of an atlas rectangle.
    ///
    /// Returns `(uv_min, uv_max)` where `uv_min` is the top-left corner in
    /// texture space (v grows downward).
    pub fn atlas_uv(&self, atlas_bounds: &Bounds) -> ([f32; 2], [f32; 2]) {
        let w = self.atlas_width as f32;
        let h = self.atlas_height as f32;
        (
            [atlas_bounds.left / w, (h - atlas_bounds.top) / h],
            [atlas_bounds.right / w, (h - atlas_bounds.bottom) / h],
        )
    }
}

/// Map a `serde_json` failure onto the load/format split: syntax problems mean
/// the document is unreadable, data problems mean a field is missing or
/// mistyped.
pub(crate) fn classify_json_error(err: &serde_json::Error, origin: &Path) -> FontError {
    match err.classify() {
        serde_json::error::Category::Data => {
            crate::error::FontFormatError::Schema(err.to_string()).into()
        }
        serde_json::error::Category::Io
        | serde_json::error::Category::Syntax
        | serde_json::error::Category::Eof => FontLoadError::Malformed {
            path: origin.to_path_buf(),
            message: err.to_string(),
        }
        .into(),
    }
}

#[cfg(test)]
pub(crate) mod tests;
