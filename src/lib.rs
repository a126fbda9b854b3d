//! Multi-channel signed distance field text rendering on wgpu.
//!
//! Load a font once with [`TextRenderer::create_font`], turn strings into
//! [`TextBlock`]s with [`TextRenderer::format_text`], then each frame call
//! [`TextRenderer::update_camera`] and [`TextRenderer::render`] inside the
//! host's render pass.

pub mod config;
pub mod error;
pub mod font;
pub mod gpu;
pub mod interaction;
pub mod layout;

pub use config::Config;
pub use error::{
    ConfigError, FontError, FontFormatError, FontLoadError, GpuResourceError, RenderTargetError,
};
pub use font::{FontSource, MsdfFont, load_font_source};
pub use gpu::{FontAsset, RenderStats, RenderTarget, TextBlock, TextRenderer};
pub use interaction::{InteractionState, text_transform};
pub use layout::{GlyphQuad, LayoutOptions, TextBounds, layout, measure};
