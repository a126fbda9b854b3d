//! On-disk font document (msdf-atlas-gen JSON layout) and its validation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{Bounds, DEFAULT_FALLBACK_ADVANCE, GlyphMetric, MsdfFont, classify_json_error};
use crate::error::{FontError, FontFormatError};

const SUPPORTED_ATLAS_TYPES: [&str; 4] = ["sdf", "psdf", "msdf", "mtsdf"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FontDocument {
    atlas: AtlasSection,
    metrics: MetricsSection,
    glyphs: Vec<GlyphEntry>,
    #[serde(default)]
    kerning: Vec<KerningEntry>,
    /// Atlas image file names relative to the document; only the first is used.
    #[serde(default)]
    pages: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AtlasSection {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    distance_range: f32,
    /// Pixels per em.
    size: f32,
    width: u32,
    height: u32,
    #[serde(default)]
    y_origin: YOrigin,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum YOrigin {
    #[default]
    Bottom,
    Top,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricsSection {
    #[serde(default = "unit_em")]
    em_size: f32,
    line_height: f32,
    #[serde(default)]
    ascender: f32,
    #[serde(default)]
    descender: f32,
}

fn unit_em() -> f32 {
    1.0
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GlyphEntry {
    unicode: u32,
    advance: f32,
    #[serde(default)]
    plane_bounds: Option<BoundsEntry>,
    #[serde(default)]
    atlas_bounds: Option<BoundsEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct BoundsEntry {
    left: f32,
    bottom: f32,
    right: f32,
    top: f32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct KerningEntry {
    unicode1: u32,
    unicode2: u32,
    advance: f32,
}

impl FontDocument {
    pub(super) fn parse(bytes: &[u8], origin: &Path) -> Result<Self, FontError> {
        serde_json::from_slice(bytes).map_err(|e| classify_json_error(&e, origin))
    }

    /// Path of the companion atlas image: the first page entry, or the
    /// document path with a `.png` extension.
    pub(super) fn image_path(&self, document_path: &Path) -> PathBuf {
        match self.pages.first() {
            Some(page) => document_path
                .parent()
                .map_or_else(|| PathBuf::from(page), |dir| dir.join(page)),
            None => document_path.with_extension("png"),
        }
    }

    pub(super) fn into_font(self) -> Result<MsdfFont, FontFormatError> {
        let atlas = &self.atlas;
        if let Some(kind) = &atlas.kind {
            if !SUPPORTED_ATLAS_TYPES.contains(&kind.as_str()) {
                return Err(FontFormatError::UnsupportedAtlasType(kind.clone()));
            }
        }
        positive("atlas.size", atlas.size)?;
        positive("atlas.distanceRange", atlas.distance_range)?;
        positive("atlas.width", atlas.width as f32)?;
        positive("atlas.height", atlas.height as f32)?;
        positive("metrics.emSize", self.metrics.em_size)?;
        positive("metrics.lineHeight", self.metrics.line_height)?;

        if self.glyphs.is_empty() {
            return Err(FontFormatError::EmptyGlyphTable);
        }

        // Metrics are expressed in units of `emSize`; store everything in em.
        let unit = self.metrics.em_size;
        let mut glyphs = HashMap::with_capacity(self.glyphs.len());
        for entry in &self.glyphs {
            let ch = to_char(entry.unicode)?;
            glyphs.insert(ch, atlas.convert_glyph(ch, entry, unit)?);
        }

        let mut kerning = HashMap::with_capacity(self.kerning.len());
        for pair in &self.kerning {
            let left = to_char(pair.unicode1)?;
            let right = to_char(pair.unicode2)?;
            finite("kerning.advance", pair.advance)?;
            kerning.insert((left, right), pair.advance / unit);
        }

        let fallback_advance = glyphs
            .get(&' ')
            .map_or(DEFAULT_FALLBACK_ADVANCE, |g: &GlyphMetric| g.advance);

        Ok(MsdfFont {
            glyphs,
            kerning,
            line_height: self.metrics.line_height / unit,
            em_size: atlas.size,
            distance_range: atlas.distance_range,
            ascender: self.metrics.ascender / unit,
            descender: self.metrics.descender / unit,
            atlas_width: atlas.width,
            atlas_height: atlas.height,
            fallback_advance,
        })
    }
}

impl AtlasSection {
    fn convert_glyph(
        &self,
        ch: char,
        entry: &GlyphEntry,
        unit: f32,
    ) -> Result<GlyphMetric, FontFormatError> {
        finite("glyph.advance", entry.advance)?;
        let (plane_bounds, atlas_bounds) = match (entry.plane_bounds, entry.atlas_bounds) {
            (None, None) => (None, None),
            (Some(plane), Some(atlas)) => (
                Some(self.plane_to_em(&plane, unit)?),
                Some(self.atlas_to_texels(ch, &atlas)?),
            ),
            _ => return Err(FontFormatError::MismatchedBounds { ch }),
        };
        Ok(GlyphMetric {
            advance: entry.advance / unit,
            plane_bounds,
            atlas_bounds,
        })
    }

    /// Plane bounds in em with y up.
    fn plane_to_em(&self, b: &BoundsEntry, unit: f32) -> Result<Bounds, FontFormatError> {
        for v in [b.left, b.bottom, b.right, b.top] {
            finite("glyph.planeBounds", v)?;
        }
        let (bottom, top) = match self.y_origin {
            YOrigin::Bottom => (b.bottom, b.top),
            YOrigin::Top => (-b.bottom, -b.top),
        };
        Ok(Bounds {
            left: b.left.min(b.right) / unit,
            bottom: bottom.min(top) / unit,
            right: b.left.max(b.right) / unit,
            top: bottom.max(top) / unit,
        })
    }

    /// Atlas bounds in texels measured from the bottom edge.
    fn atlas_to_texels(&self, ch: char, b: &BoundsEntry) -> Result<Bounds, FontFormatError> {
        let w = self.width as f32;
        let h = self.height as f32;
        let left = b.left.min(b.right);
        let right = b.left.max(b.right);
        let lo = b.bottom.min(b.top);
        let hi = b.bottom.max(b.top);
        let in_range = left.is_finite()
            && right.is_finite()
            && lo.is_finite()
            && hi.is_finite()
            && left >= 0.0
            && lo >= 0.0
            && right <= w
            && hi <= h;
        if !in_range {
            return Err(FontFormatError::AtlasBoundsOutOfRange {
                ch,
                width: self.width,
                height: self.height,
            });
        }
        let (bottom, top) = match self.y_origin {
            YOrigin::Bottom => (lo, hi),
            YOrigin::Top => (h - hi, h - lo),
        };
        Ok(Bounds {
            left,
            bottom,
            right,
            top,
        })
    }
}

fn to_char(code: u32) -> Result<char, FontFormatError> {
    char::from_u32(code).ok_or(FontFormatError::InvalidCodepoint(code))
}

fn finite(name: &'static str, value: f32) -> Result<(), FontFormatError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(FontFormatError::InvalidMetric { name, value })
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), FontFormatError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FontFormatError::InvalidMetric { name, value })
    }
}
