//! Font parsing and loading tests.

use std::path::{Path, PathBuf};

use serde_json::{Value, json};

use super::*;
use crate::error::{FontFormatError, FontLoadError};

/// msdf-atlas-gen style document for a tiny font: space, `a`, `b`, `A`, `V`.
pub(crate) fn fixture_value() -> Value {
    json!({
        "atlas": {
            "type": "msdf",
            "distanceRange": 4,
            "size": 64,
            "width": 256,
            "height": 256,
            "yOrigin": "bottom"
        },
        "metrics": {
            "emSize": 1,
            "lineHeight": 1.25,
            "ascender": 0.9,
            "descender": -0.3
        },
        "glyphs": [
            { "unicode": 32, "advance": 0.25 },
            {
                "unicode": 97,
                "advance": 0.5,
                "planeBounds": { "left": 0, "bottom": 0, "right": 1, "top": 1 },
                "atlasBounds": { "left": 0, "bottom": 0, "right": 64, "top": 64 }
            },
            {
                "unicode": 98,
                "advance": 0.6,
                "planeBounds": { "left": 0.05, "bottom": -0.1, "right": 0.55, "top": 0.7 },
                "atlasBounds": { "left": 64, "bottom": 0, "right": 96, "top": 52 }
            },
            {
                "unicode": 65,
                "advance": 0.7,
                "planeBounds": { "left": 0, "bottom": 0, "right": 0.7, "top": 0.8 },
                "atlasBounds": { "left": 96, "bottom": 0, "right": 141, "top": 51 }
            },
            {
                "unicode": 86,
                "advance": 0.7,
                "planeBounds": { "left": 0, "bottom": 0, "right": 0.7, "top": 0.8 },
                "atlasBounds": { "left": 141, "bottom": 0, "right": 186, "top": 51 }
            }
        ],
        "kerning": [
            { "unicode1": 65, "unicode2": 86, "advance": -0.1 }
        ]
    })
}

pub(crate) fn parse_value(value: &Value) -> Result<MsdfFont, FontError> {
    let bytes = serde_json::to_vec(value).expect("serialize fixture");
    MsdfFont::parse(&bytes, Path::new("fixture.json"))
}

pub(crate) fn fixture_font() -> MsdfFont {
    parse_value(&fixture_value()).expect("fixture font parses")
}

/// Write the fixture document and a matching atlas image into `dir`.
pub(crate) fn write_fixture(dir: &Path, value: &Value, image_size: (u32, u32)) -> PathBuf {
    let json_path = dir.join("fixture.json");
    std::fs::write(&json_path, serde_json::to_vec(value).expect("serialize")).expect("write json");
    image::RgbaImage::from_pixel(image_size.0, image_size.1, image::Rgba([255, 128, 0, 255]))
        .save(dir.join("fixture.png"))
        .expect("write png");
    json_path
}

fn format_error(value: &Value) -> FontFormatError {
    match parse_value(value) {
        Err(FontError::Format(e)) => e,
        Err(other) => panic!("expected format error, got {other:?}"),
        Ok(_) => panic!("expected format error, got a font"),
    }
}

// --- Parsing ---

#[test]
fn fixture_parses_with_expected_metrics() {
    let font = fixture_font();
    assert_eq!(font.glyph_count(), 5);
    assert!((font.em_size() - 64.0).abs() < f32::EPSILON);
    assert!((font.line_height() - 1.25).abs() < f32::EPSILON);
    assert!((font.distance_range() - 4.0).abs() < f32::EPSILON);
    assert!((font.ascender() - 0.9).abs() < f32::EPSILON);
    assert!((font.descender() + 0.3).abs() < f32::EPSILON);
    assert_eq!(font.atlas_size(), (256, 256));
}

#[test]
fn space_has_no_ink() {
    let font = fixture_font();
    let space = font.glyph(' ').expect("space");
    assert!(space.ink().is_none());
    assert!((space.advance - 0.25).abs() < f32::EPSILON);
}

#[test]
fn kerning_lookup_is_ordered() {
    let font = fixture_font();
    assert!((font.kerning('A', 'V') + 0.1).abs() < f32::EPSILON);
    assert!(font.kerning('V', 'A').abs() < f32::EPSILON);
}

#[test]
fn fallback_advance_uses_space_width() {
    let font = fixture_font();
    assert!((font.fallback_advance() - 0.25).abs() < f32::EPSILON);
}

#[test]
fn fallback_advance_defaults_without_space() {
    let mut value = fixture_value();
    value["glyphs"]
        .as_array_mut()
        .expect("glyph array")
        .retain(|g| g["unicode"] != 32);
    let font = parse_value(&value).expect("parse");
    assert!((font.fallback_advance() - DEFAULT_FALLBACK_ADVANCE).abs() < f32::EPSILON);
    let font = font.with_fallback_advance(0.75);
    assert!((font.fallback_advance() - 0.75).abs() < f32::EPSILON);
}

#[test]
fn em_size_normalizes_metrics() {
    let mut value = fixture_value();
    value["metrics"]["emSize"] = json!(2);
    value["metrics"]["lineHeight"] = json!(2.5);
    let font = parse_value(&value).expect("parse");
    assert!((font.line_height() - 1.25).abs() < f32::EPSILON);
    let a = font.glyph('a').expect("a");
    assert!((a.advance - 0.25).abs() < f32::EPSILON);
    let (plane, _) = a.ink().expect("ink");
    assert!((plane.width() - 0.5).abs() < f32::EPSILON);
    assert!((font.kerning('A', 'V') + 0.05).abs() < f32::EPSILON);
}

#[test]
fn optional_fields_default() {
    let value = json!({
        "atlas": { "distanceRange": 2, "size": 32, "width": 64, "height": 64 },
        "metrics": { "lineHeight": 1.0 },
        "glyphs": [ { "unicode": 120, "advance": 0.5 } ]
    });
    let font = parse_value(&value).expect("parse");
    assert_eq!(font.glyph_count(), 1);
    assert!(font.ascender().abs() < f32::EPSILON);
    assert!(font.kerning('x', 'x').abs() < f32::EPSILON);
}

#[test]
fn atlas_uv_flips_bottom_origin() {
    let font = fixture_font();
    let (_, atlas) = font.glyph('a').expect("a").ink().expect("ink");
    let (uv_min, uv_max) = font.atlas_uv(&atlas);
    assert_eq!(uv_min, [0.0, 0.75]);
    assert_eq!(uv_max, [0.25, 1.0]);
}

#[test]
fn top_origin_is_converted_to_bottom_up() {
    let mut value = fixture_value();
    value["atlas"]["yOrigin"] = json!("top");
    // Same glyph described from the top edge with y pointing down.
    value["glyphs"][1]["planeBounds"] = json!({ "left": 0, "bottom": 0, "right": 1, "top": -1 });
    value["glyphs"][1]["atlasBounds"] = json!({ "left": 0, "bottom": 256, "right": 64, "top": 192 });
    let font = parse_value(&value).expect("parse");
    let (plane, atlas) = font.glyph('a').expect("a").ink().expect("ink");
    assert_eq!(plane, Bounds { left: 0.0, bottom: 0.0, right: 1.0, top: 1.0 });
    assert_eq!(atlas, Bounds { left: 0.0, bottom: 0.0, right: 64.0, top: 64.0 });
}

// --- Format errors ---

#[test]
fn empty_glyph_table_is_rejected() {
    let mut value = fixture_value();
    value["glyphs"] = json!([]);
    assert_eq!(format_error(&value), FontFormatError::EmptyGlyphTable);
}

#[test]
fn missing_glyph_table_is_schema_error() {
    let mut value = fixture_value();
    value.as_object_mut().expect("object").remove("glyphs");
    assert!(matches!(format_error(&value), FontFormatError::Schema(_)));
}

#[test]
fn missing_atlas_metrics_is_schema_error() {
    let mut value = fixture_value();
    value["atlas"].as_object_mut().expect("object").remove("width");
    assert!(matches!(format_error(&value), FontFormatError::Schema(_)));
}

#[test]
fn non_positive_em_size_is_rejected() {
    let mut value = fixture_value();
    value["atlas"]["size"] = json!(0);
    assert!(matches!(
        format_error(&value),
        FontFormatError::InvalidMetric { name: "atlas.size", .. }
    ));
}

#[test]
fn negative_line_height_is_rejected() {
    let mut value = fixture_value();
    value["metrics"]["lineHeight"] = json!(-1.0);
    assert!(matches!(
        format_error(&value),
        FontFormatError::InvalidMetric { name: "metrics.lineHeight", .. }
    ));
}

#[test]
fn unknown_atlas_type_is_rejected() {
    let mut value = fixture_value();
    value["atlas"]["type"] = json!("hardmask");
    assert_eq!(
        format_error(&value),
        FontFormatError::UnsupportedAtlasType("hardmask".into())
    );
}

#[test]
fn surrogate_codepoint_is_rejected() {
    let mut value = fixture_value();
    value["glyphs"][1]["unicode"] = json!(0xD800);
    assert_eq!(format_error(&value), FontFormatError::InvalidCodepoint(0xD800));
}

#[test]
fn plane_bounds_without_atlas_bounds_is_rejected() {
    let mut value = fixture_value();
    value["glyphs"][1]
        .as_object_mut()
        .expect("object")
        .remove("atlasBounds");
    assert_eq!(
        format_error(&value),
        FontFormatError::MismatchedBounds { ch: 'a' }
    );
}

#[test]
fn atlas_bounds_outside_atlas_are_rejected() {
    let mut value = fixture_value();
    value["glyphs"][1]["atlasBounds"]["right"] = json!(300);
    assert_eq!(
        format_error(&value),
        FontFormatError::AtlasBoundsOutOfRange { ch: 'a', width: 256, height: 256 }
    );
}

#[test]
fn json_syntax_error_is_load_error() {
    let err = MsdfFont::parse(b"{ \"atlas\": ", Path::new("broken.json")).unwrap_err();
    assert!(matches!(err, FontError::Load(FontLoadError::Malformed { .. })));
}

// --- Loading from disk ---

#[test]
fn load_reads_document_and_sibling_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_fixture(dir.path(), &fixture_value(), (256, 256));
    let source = load_font_source(path.to_str().expect("utf-8 path")).expect("load");
    assert_eq!(source.font.glyph_count(), 5);
    assert_eq!(source.atlas.dimensions(), (256, 256));
    assert_eq!(source.atlas.get_pixel(0, 0).0, [255, 128, 0, 255]);
    assert_eq!(source.path, path);
}

#[test]
fn load_accepts_file_url() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_fixture(dir.path(), &fixture_value(), (256, 256));
    let url = url::Url::from_file_path(&path).expect("absolute path");
    assert!(load_font_source(url.as_str()).is_ok());
}

#[test]
fn load_accepts_percent_encoded_file_url() {
    let dir = tempfile::tempdir().expect("tempdir");
    let fonts = dir.path().join("my fonts");
    std::fs::create_dir(&fonts).expect("mkdir");
    let path = write_fixture(&fonts, &fixture_value(), (256, 256));

    let url = url::Url::from_file_path(&path).expect("absolute path");
    assert!(url.as_str().contains("my%20fonts"));
    let source = load_font_source(url.as_str()).expect("load");
    assert_eq!(source.path, path);
}

#[test]
fn load_uses_pages_entry() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut value = fixture_value();
    value["pages"] = json!(["atlas-page.png"]);
    let path = write_fixture(dir.path(), &value, (256, 256));
    // The sibling fixture.png exists but the page entry points elsewhere.
    let err = load_font_source(path.to_str().expect("utf-8 path")).err().expect("missing page");
    assert!(matches!(err, FontError::Load(FontLoadError::Io { .. })));

    image::RgbaImage::new(256, 256)
        .save(dir.path().join("atlas-page.png"))
        .expect("write page");
    assert!(load_font_source(path.to_str().expect("utf-8 path")).is_ok());
}

#[test]
fn load_missing_document_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("nope.json");
    let err = load_font_source(missing.to_str().expect("utf-8 path")).err().expect("error");
    assert!(matches!(err, FontError::Load(FontLoadError::Io { .. })));
}

#[test]
fn load_rejects_mismatched_atlas_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_fixture(dir.path(), &fixture_value(), (128, 256));
    let err = load_font_source(path.to_str().expect("utf-8 path")).err().expect("error");
    assert!(matches!(
        err,
        FontError::Format(FontFormatError::AtlasSizeMismatch {
            width: 256,
            height: 256,
            actual_width: 128,
            actual_height: 256,
        })
    ));
}

#[test]
fn load_rejects_corrupt_image() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_fixture(dir.path(), &fixture_value(), (256, 256));
    std::fs::write(dir.path().join("fixture.png"), b"not a png").expect("overwrite");
    let err = load_font_source(path.to_str().expect("utf-8 path")).err().expect("error");
    assert!(matches!(err, FontError::Load(FontLoadError::Image { .. })));
}
