use glam::UVec3;

use crate::VolumeTextureSink;

const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Bgra8Unorm;

/// [`VolumeTextureSink`] backed by a wgpu 3D texture.
///
/// The texture gets (re)allocated whenever the volume's size changes.
pub struct WgpuVolumeTexture<'a> {
    device: &'a wgpu::Device,
    queue: &'a wgpu::Queue,
    label: String,
    texture: Option<(UVec3, wgpu::Texture)>,
}

impl<'a> WgpuVolumeTexture<'a> {
    pub fn new(
        device: &'a wgpu::Device,
        queue: &'a wgpu::Queue,
        label: impl AsRef<str>,
    ) -> Self {
        Self {
            device,
            queue,
            label: label.as_ref().to_owned(),
            texture: None,
        }
    }

    pub fn texture(&self) -> Option<&wgpu::Texture> {
        self.texture.as_ref().map(|(_, texture)| texture)
    }

    fn allocate(&self, size: UVec3) -> wgpu::Texture {
        log::debug!("Allocating texture `{}`; size={}", self.label, size);

        self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&format!("{}_tex", self.label)),
            size: wgpu::Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: size.z,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format: FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        })
    }
}

impl VolumeTextureSink for WgpuVolumeTexture<'_> {
    fn upload(&mut self, size: UVec3, data: &[u8]) {
        if size.cmpeq(UVec3::ZERO).any() {
            log::warn!("Not uploading empty volume `{}`", self.label);
            return;
        }

        let texture = match self.texture.take() {
            Some((tex_size, texture)) if tex_size == size => texture,
            _ => self.allocate(size),
        };

        self.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(size.x * 4),
                rows_per_image: Some(size.y),
            },
            wgpu::Extent3d {
                width: size.x,
                height: size.y,
                depth_or_array_layers: size.z,
            },
        );

        self.texture = Some((size, texture));
    }
}
