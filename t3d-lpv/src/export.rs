use bytemuck::{Pod, Zeroable};
use glam::{UVec3, Vec4};
use t3d_math::F32Ext;

/// Device-side 3D texture the baked volume gets uploaded into.
pub trait VolumeTextureSink {
    /// Creates (or updates) the texture; `data` holds `size.x * size.y *
    /// size.z` BGRA texels, x-minor and z-major.
    fn upload(&mut self, size: UVec3, data: &[u8]);
}

impl VolumeTextureSink for Vec<u8> {
    fn upload(&mut self, _: UVec3, data: &[u8]) {
        self.clear();
        self.extend_from_slice(data);
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Bgra8 {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Bgra8 {
    /// Quantizes given color; RGB gets scaled by `intensity` first.
    pub fn from_color(color: Vec4, intensity: f32) -> Self {
        let quantize = |value: f32| (value.saturate() * 255.0) as u8;

        Self {
            b: quantize(color.z * intensity),
            g: quantize(color.y * intensity),
            r: quantize(color.x * intensity),
            a: quantize(color.w),
        }
    }
}

/// Flattens colors, given in the grid's linear order, into texture bytes.
pub fn to_bgra(
    colors: impl IntoIterator<Item = Vec4>,
    intensity: f32,
) -> Vec<u8> {
    let texels: Vec<_> = colors
        .into_iter()
        .map(|color| Bgra8::from_color(color, intensity))
        .collect();

    bytemuck::cast_slice(&texels).to_vec()
}
