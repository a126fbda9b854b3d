//! Font source loading: document + companion atlas image from the filesystem.

use std::path::{Path, PathBuf};

use url::Url;

use super::MsdfFont;
use super::document::FontDocument;
use crate::error::{FontError, FontFormatError, FontLoadError};

/// A parsed font and its decoded atlas, not yet on the GPU.
pub struct FontSource {
    pub font: MsdfFont,
    pub atlas: image::RgbaImage,
    /// Path of the font document this source was read from.
    pub path: PathBuf,
}

/// Read a font document and its atlas image.
///
/// `url` is a filesystem path or a `file://` URL. Every call re-reads the
/// files; callers that want to share a font keep the result around.
pub fn load_font_source(url: &str) -> Result<FontSource, FontError> {
    let path = resolve_url(url)?;
    let bytes = std::fs::read(&path).map_err(|source| FontLoadError::Io {
        path: path.clone(),
        source,
    })?;

    let doc = FontDocument::parse(&bytes, &path)?;
    let image_path = doc.image_path(&path);
    let font = doc.into_font()?;
    let atlas = decode_atlas(&image_path)?;

    let (width, height) = font.atlas_size();
    if atlas.dimensions() != (width, height) {
        return Err(FontFormatError::AtlasSizeMismatch {
            width,
            height,
            actual_width: atlas.width(),
            actual_height: atlas.height(),
        }
        .into());
    }

    log::debug!(
        "font: loaded {} ({} glyphs, atlas {}x{} from {})",
        path.display(),
        font.glyph_count(),
        width,
        height,
        image_path.display(),
    );

    Ok(FontSource { font, atlas, path })
}

/// Turn a path or URL into a local path.
///
/// Strings that do not parse as an absolute URL are plain paths. Single
/// letter schemes are Windows drive letters, not URLs.
fn resolve_url(url: &str) -> Result<PathBuf, FontLoadError> {
    let parsed = match Url::parse(url) {
        Ok(parsed) if parsed.scheme().len() > 1 => parsed,
        _ => return Ok(PathBuf::from(url)),
    };
    if parsed.scheme() != "file" {
        return Err(FontLoadError::UnsupportedScheme(url.to_owned()));
    }
    parsed
        .to_file_path()
        .map_err(|()| FontLoadError::NonLocalFileUrl(url.to_owned()))
}

fn decode_atlas(path: &Path) -> Result<image::RgbaImage, FontLoadError> {
    let image = image::open(path).map_err(|err| match err {
        image::ImageError::IoError(source) => FontLoadError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => FontLoadError::Image {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(image.to_rgba8())
}
