//! GPU side of a loaded font: the distance-field atlas texture and its bind group.

use crate::error::GpuResourceError;
use crate::font::MsdfFont;

/// An [`MsdfFont`] paired with its uploaded atlas.
///
/// The atlas is written once at upload and never again. Text blocks clone
/// the bind group, so any number of blocks share one texture.
#[derive(Debug)]
pub struct FontAsset {
    font: MsdfFont,
    texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

impl FontAsset {
    /// Upload `atlas` and bind it with `sampler` under `layout`.
    pub(super) fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        font: MsdfFont,
        atlas: &image::RgbaImage,
    ) -> Result<Self, GpuResourceError> {
        let (width, height) = atlas.dimensions();
        check_texture_size(width, height, device.limits().max_texture_dimension_2d)?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msdf_atlas"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            // Distances are linear data, never sRGB-decoded.
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            atlas.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("msdf_atlas_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        log::debug!(
            "font atlas uploaded: {width}x{height}, {} glyphs",
            font.glyph_count()
        );

        Ok(Self {
            font,
            texture,
            bind_group,
        })
    }

    pub fn font(&self) -> &MsdfFont {
        &self.font
    }

    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub(super) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Reject textures the device cannot allocate.
pub(super) fn check_texture_size(
    width: u32,
    height: u32,
    limit: u32,
) -> Result<(), GpuResourceError> {
    if width > limit || height > limit {
        return Err(GpuResourceError::TextureTooLarge {
            width,
            height,
            limit,
        });
    }
    Ok(())
}

/// Reject buffers the device cannot allocate.
pub(super) fn check_buffer_size(size: u64, limit: u64) -> Result<(), GpuResourceError> {
    if size > limit {
        return Err(GpuResourceError::BufferTooLarge { size, limit });
    }
    Ok(())
}
