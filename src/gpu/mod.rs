//! GPU rendering: MSDF pipeline, font atlas upload, text blocks.

mod atlas;
mod instance_writer;
mod pipeline;
mod renderer;
mod text_block;
mod uniforms;

pub use atlas::FontAsset;
pub use pipeline::{BLOCK_UNIFORM_SIZE, CAMERA_UNIFORM_SIZE, INSTANCE_STRIDE};
pub use renderer::{RenderStats, RenderTarget, TextRenderer};
pub use text_block::TextBlock;
pub use uniforms::{BlockUniform, CameraUniform};
