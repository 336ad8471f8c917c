//! Texture loading and upload.
//!
//! Textures are decoded to RGBA8 on the CPU and written to the GPU once at
//! startup. Missing or unreadable files are not fatal: callers fall back to
//! small procedural placeholders so the binary runs without any assets on
//! disk.

use std::path::Path;

use crate::error::TextureError;

/// Decoded RGBA8 image data.
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl TextureData {
    /// Upload to a new 2D texture and return a view of it.
    pub fn create_view(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
    ) -> wgpu::TextureView {
        let size = wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
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
            &self.data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            size,
        );

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }
}

/// Load and decode an image file.
pub fn load(path: impl AsRef<Path>) -> Result<TextureData, TextureError> {
    let path = path.as_ref();
    let image = image::open(path)?.to_rgba8();
    let (width, height) = image.dimensions();
    log::info!("loaded texture {} ({width}x{height})", path.display());
    Ok(TextureData {
        width,
        height,
        data: image.into_raw(),
    })
}

/// Load an image, or build a placeholder if the file is unavailable.
pub fn load_or(path: impl AsRef<Path>, fallback: fn() -> TextureData) -> TextureData {
    match load(&path) {
        Ok(texture) => texture,
        Err(err) => {
            log::warn!(
                "texture {} unavailable ({err}), using procedural placeholder",
                path.as_ref().display()
            );
            fallback()
        }
    }
}

/// Banded ocean-tone placeholder for the surface texture.
pub fn placeholder_surface() -> TextureData {
    let (width, height) = (256u32, 128u32);
    let mut data = Vec::with_capacity((width * height * 4) as usize);

    for y in 0..height {
        let v = y as f32 / (height - 1) as f32;
        let lat = (0.5 - v) * std::f32::consts::PI;
        let band = ((lat * 6.0).cos() * 0.5 + 0.5) * 0.35;
        let polar = ((lat.abs() / std::f32::consts::FRAC_PI_2 - 0.8) * 5.0).clamp(0.0, 1.0);

        let r = 0.05 + 0.05 * band + 0.6 * polar;
        let g = 0.10 + 0.10 * band + 0.6 * polar;
        let b = 0.22 + 0.13 * band + 0.55 * polar;

        for _ in 0..width {
            data.push((r * 255.0) as u8);
            data.push((g * 255.0) as u8);
            data.push((b * 255.0) as u8);
            data.push(255);
        }
    }

    TextureData {
        width,
        height,
        data,
    }
}

/// Flat mid-gray placeholder for the bump map. Produces no relief.
pub fn placeholder_bump() -> TextureData {
    let (width, height) = (4u32, 4u32);
    TextureData {
        width,
        height,
        data: vec![128; (width * height * 4) as usize],
    }
}

/// Sampler shared by the globe textures. Longitude wraps, latitude clamps.
pub fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("globe sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
