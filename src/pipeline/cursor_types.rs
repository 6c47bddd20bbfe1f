// Decoded bitmaps ready for a cursor writer

use image::RgbaImage;
use std::path::Path;

use super::expander::CursorConfig;
use crate::error::{BuildError, BuildResult};

#[derive(Debug, Clone)]
pub struct CursorImage {
    pub image: RgbaImage,
    pub nominal_size: u32,
    pub hotspot: (u32, u32),
    pub delay_ms: u32,
}

impl CursorImage {
    /// Hotspot clamped into the bitmap; cursor formats reject hotspots past
    /// the last pixel.
    pub fn clamped_hotspot(&self) -> (u32, u32) {
        (
            self.hotspot.0.min(self.image.width().saturating_sub(1)),
            self.hotspot.1.min(self.image.height().saturating_sub(1)),
        )
    }
}

/// Loads every image a config references, in row order.
pub fn load_images(config: &CursorConfig, image_root: &Path) -> BuildResult<Vec<CursorImage>> {
    let mut images = Vec::with_capacity(config.lines.len());

    for line in &config.lines {
        let path = image_root.join(&line.image_path);
        if !path.exists() {
            return Err(BuildError::MissingImage {
                cursor: config.name.clone(),
                path,
            });
        }

        let image = image::open(&path)?.to_rgba8();
        images.push(CursorImage {
            image,
            nominal_size: line.pixel_size,
            hotspot: (line.xhot, line.yhot),
            delay_ms: line.delay_ms.unwrap_or(0),
        });
    }

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::expander::ConfigLine;
    use tempfile::tempdir;

    #[test]
    fn test_clamped_hotspot() {
        let img = CursorImage {
            image: RgbaImage::new(24, 24),
            nominal_size: 24,
            hotspot: (24, 3),
            delay_ms: 0,
        };
        assert_eq!(img.clamped_hotspot(), (23, 3));
    }

    #[test]
    fn test_load_images_missing() {
        let dir = tempdir().unwrap();
        let config = CursorConfig {
            name: "left_ptr".to_string(),
            lines: vec![ConfigLine {
                pixel_size: 24,
                xhot: 1,
                yhot: 1,
                image_path: "x1/left_ptr.png".to_string(),
                delay_ms: None,
            }],
        };

        match load_images(&config, dir.path()).unwrap_err() {
            BuildError::MissingImage { cursor, path } => {
                assert_eq!(cursor, "left_ptr");
                assert!(path.ends_with("x1/left_ptr.png"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
