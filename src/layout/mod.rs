//! Text layout: string + font + options to positioned glyph quads.
//!
//! Pure geometry. Nothing here touches the GPU, so the whole module is
//! testable without a device.

use crate::font::MsdfFont;

/// Options fixed when a text block is formatted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Move the local origin to the centre of the text's bounding box.
    pub centered: bool,
    /// Multiplier from atlas pixels to local units, baked into the quads.
    pub pixel_scale: f32,
    /// Straight RGBA; carried through to the block, not used by layout.
    pub color: [f32; 4],
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            centered: false,
            pixel_scale: 1.0,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// One rendered character.
///
/// `position` is the bottom-left corner in y-up local space. `uv_min` is the
/// top-left texture coordinate and `uv_max` the bottom-right one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub uv_min: [f32; 2],
    pub uv_max: [f32; 2],
}

impl GlyphQuad {
    pub fn left(&self) -> f32 {
        self.position[0]
    }

    pub fn right(&self) -> f32 {
        self.position[0] + self.size[0]
    }

    pub fn bottom(&self) -> f32 {
        self.position[1]
    }

    pub fn top(&self) -> f32 {
        self.position[1] + self.size[1]
    }
}

/// Axis-aligned extent of a set of quads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextBounds {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl TextBounds {
    pub fn center(&self) -> [f32; 2] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
        ]
    }

    pub fn size(&self) -> [f32; 2] {
        [self.max[0] - self.min[0], self.max[1] - self.min[1]]
    }
}

/// Bounding box of `quads`, or `None` when there are none.
pub fn measure(quads: &[GlyphQuad]) -> Option<TextBounds> {
    let first = quads.first()?;
    let mut bounds = TextBounds {
        min: [first.left(), first.bottom()],
        max: [first.right(), first.top()],
    };
    for q in &quads[1..] {
        bounds.min[0] = bounds.min[0].min(q.left());
        bounds.min[1] = bounds.min[1].min(q.bottom());
        bounds.max[0] = bounds.max[0].max(q.right());
        bounds.max[1] = bounds.max[1].max(q.top());
    }
    Some(bounds)
}

/// Lay out `text` with `font`.
///
/// Line breaks (`'\n'` and U+2028 LINE SEPARATOR; `'\r'` is skipped, so CRLF
/// counts once) reset x and move down one line height. Whitespace advances
/// without emitting a quad. Characters missing from the font emit nothing and
/// advance by the font's fallback advance. The returned quads follow string
/// order.
pub fn layout(font: &MsdfFont, text: &str, options: &LayoutOptions) -> Vec<GlyphQuad> {
    let em = font.em_size();
    let mut quads = Vec::with_capacity(text.len());
    let mut pen = [0.0_f32, 0.0_f32];
    let mut prev: Option<char> = None;
    let mut missing = 0usize;

    for ch in text.chars() {
        match ch {
            '\n' | '\u{2028}' => {
                pen[0] = 0.0;
                pen[1] -= font.line_height() * em;
                prev = None;
                continue;
            }
            // CRLF behaves like LF.
            '\r' => continue,
            _ => {}
        }

        let Some(glyph) = font.glyph(ch) else {
            missing += 1;
            pen[0] += font.fallback_advance() * em;
            prev = Some(ch);
            continue;
        };

        if let Some(p) = prev {
            pen[0] += font.kerning(p, ch) * em;
        }

        if let Some((plane, atlas)) = glyph.ink().filter(|_| !ch.is_whitespace()) {
            let (uv_min, uv_max) = font.atlas_uv(&atlas);
            quads.push(GlyphQuad {
                position: [pen[0] + plane.left * em, pen[1] + plane.bottom * em],
                size: [plane.width() * em, plane.height() * em],
                uv_min,
                uv_max,
            });
        }

        pen[0] += glyph.advance * em;
        prev = Some(ch);
    }

    if missing > 0 {
        log::debug!("layout: {missing} character(s) not in font, used fallback advance");
    }

    if options.centered {
        if let Some(bounds) = measure(&quads) {
            let [cx, cy] = bounds.center();
            for q in &mut quads {
                q.position[0] -= cx;
                q.position[1] -= cy;
            }
        }
    }

    let s = options.pixel_scale;
    for q in &mut quads {
        q.position = [q.position[0] * s, q.position[1] * s];
        q.size = [q.size[0] * s, q.size[1] * s];
    }

    quads
}
