use std::path::{Path, PathBuf};

use derivative::Derivative;
use fxhash::FxHashMap;
use glam::{Vec2, Vec4};
use image::RgbaImage;
use log::{debug, warn};

/// Decoded diffuse textures, keyed by their file path.
///
/// Textures that failed to load are remembered as well, so that a broken
/// path gets reported only once per bake.
#[derive(Default, Derivative)]
#[derivative(Debug)]
pub struct TextureCache {
    #[derivative(Debug = "ignore")]
    textures: FxHashMap<PathBuf, Option<RgbaImage>>,
}

impl TextureCache {
    pub fn insert(&mut self, path: impl Into<PathBuf>, image: RgbaImage) {
        self.textures.insert(path.into(), Some(image));
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn clear(&mut self) {
        self.textures.clear();
    }

    /// Samples texture at given UV using nearest filtering and repeat
    /// wrapping; returns `None` if the texture cannot be loaded.
    pub fn sample(&mut self, path: &Path, uv: Vec2) -> Option<Vec4> {
        let image = self.get_or_load(path)?;
        let (width, height) = image.dimensions();

        if width == 0 || height == 0 {
            return None;
        }

        let x = texel(uv.x, width);
        let y = texel(uv.y, height);
        let [r, g, b, a] = image.get_pixel(x, y).0;

        Some(Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0)
    }

    fn get_or_load(&mut self, path: &Path) -> Option<&RgbaImage> {
        self.textures
            .entry(path.to_owned())
            .or_insert_with(|| {
                debug!("Loading texture `{}`", path.display());

                match image::open(path) {
                    Ok(image) => Some(image.into_rgba8()),

                    Err(err) => {
                        warn!(
                            "Cannot load texture `{}`: {}",
                            path.display(),
                            err
                        );

                        None
                    }
                }
            })
            .as_ref()
    }
}

fn texel(coord: f32, size: u32) -> u32 {
    let coord = coord - coord.floor();

    ((coord * size as f32) as u32).min(size - 1)
}

#[cfg(test)]
mod tests {
    use glam::vec2;
    use image::Rgba;

    use super::*;

    fn target() -> TextureCache {
        let mut image = RgbaImage::new(2, 2);

        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        image.put_pixel(1, 1, Rgba([255, 255, 255, 0]));

        let mut target = TextureCache::default();

        target.insert("checker.png", image);
        target
    }

    #[test]
    fn sample() {
        let mut target = target();
        let path = Path::new("checker.png");

        assert_eq!(
            Some(Vec4::new(1.0, 0.0, 0.0, 1.0)),
            target.sample(path, vec2(0.25, 0.25))
        );

        assert_eq!(
            Some(Vec4::new(0.0, 1.0, 0.0, 1.0)),
            target.sample(path, vec2(0.75, 0.25))
        );

        assert_eq!(
            Some(Vec4::new(1.0, 1.0, 1.0, 0.0)),
            target.sample(path, vec2(0.75, 0.75))
        );
    }

    #[test]
    fn sample_wraps() {
        let mut target = target();
        let path = Path::new("checker.png");

        assert_eq!(
            target.sample(path, vec2(0.25, 0.75)),
            target.sample(path, vec2(-0.75, 1.75))
        );
    }

    #[test]
    fn sample_missing() {
        let mut target = TextureCache::default();
        let path = Path::new("/definitely/not/there.png");

        assert_eq!(None, target.sample(path, Vec2::ZERO));
        assert_eq!(None, target.sample(path, Vec2::ZERO));
        assert_eq!(1, target.len());
    }
}
