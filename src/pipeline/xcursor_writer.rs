use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

use super::cursor_types::CursorImage;
use crate::error::BuildResult;

const MAGIC: &[u8] = b"Xcur";
const VERSION: u32 = 0x0001_0000;
const HEADER_SIZE: u32 = 16;
const CHUNK_HEADER_SIZE: u32 = 36;
const CHUNK_IMAGE: u32 = 0xFFFD_0002;
const IMAGE_VERSION: u32 = 1;

/// Serializes images into one Xcursor file, one image chunk per entry, in
/// the order given.
pub fn to_x11(images: &[CursorImage]) -> BuildResult<Vec<u8>> {
    let mut output = Vec::new();
    let chunks: Vec<ChunkData> = images.iter().map(ChunkData::from_image).collect();

    output.write_all(MAGIC)?;
    output.write_u32::<LittleEndian>(HEADER_SIZE)?;
    output.write_u32::<LittleEndian>(VERSION)?;
    output.write_u32::<LittleEndian>(chunks.len() as u32)?;

    // each TOC entry is type, subtype, position
    let toc_size = chunks.len() * 12;
    let mut offset = HEADER_SIZE as usize + toc_size;

    for chunk in &chunks {
        output.write_u32::<LittleEndian>(CHUNK_IMAGE)?;
        output.write_u32::<LittleEndian>(chunk.nominal)?;
        output.write_u32::<LittleEndian>(offset as u32)?;

        offset += CHUNK_HEADER_SIZE as usize + chunk.pixels.len();
    }

    for chunk in &chunks {
        output.write_u32::<LittleEndian>(CHUNK_HEADER_SIZE)?;
        output.write_u32::<LittleEndian>(CHUNK_IMAGE)?;
        output.write_u32::<LittleEndian>(chunk.nominal)?;
        output.write_u32::<LittleEndian>(IMAGE_VERSION)?;
        output.write_u32::<LittleEndian>(chunk.width)?;
        output.write_u32::<LittleEndian>(chunk.height)?;
        output.write_u32::<LittleEndian>(chunk.hotspot_x)?;
        output.write_u32::<LittleEndian>(chunk.hotspot_y)?;
        output.write_u32::<LittleEndian>(chunk.delay)?;

        output.write_all(&chunk.pixels)?;
    }

    Ok(output)
}

struct ChunkData {
    nominal: u32,
    width: u32,
    height: u32,
    hotspot_x: u32,
    hotspot_y: u32,
    delay: u32,
    pixels: Vec<u8>,
}

impl ChunkData {
    fn from_image(cursor: &CursorImage) -> Self {
        let (hotspot_x, hotspot_y) = cursor.clamped_hotspot();
        Self {
            nominal: cursor.nominal_size,
            width: cursor.image.width(),
            height: cursor.image.height(),
            hotspot_x,
            hotspot_y,
            delay: cursor.delay_ms,
            pixels: premultiply_bgra(&cursor.image),
        }
    }
}

/// Xcursor pixels are premultiplied ARGB stored little-endian, i.e. BGRA bytes.
pub(crate) fn premultiply_bgra(image: &image::RgbaImage) -> Vec<u8> {
    let mut result = Vec::with_capacity((image.width() * image.height() * 4) as usize);

    for pixel in image.pixels() {
        let a = pixel[3] as u32;
        let premul = |c: u8| ((c as u32 * a + 127) / 255) as u8;

        result.push(premul(pixel[2]));
        result.push(premul(pixel[1]));
        result.push(premul(pixel[0]));
        result.push(pixel[3]);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(size: u32, delay_ms: u32) -> CursorImage {
        let mut img = RgbaImage::new(size, size);
        for pixel in img.pixels_mut() {
            *pixel = Rgba([255, 255, 255, 255]);
        }
        CursorImage {
            image: img,
            nominal_size: size,
            hotspot: (size / 2, size / 2),
            delay_ms,
        }
    }

    #[test]
    fn test_premultiply() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([255, 255, 255, 128]));
        img.put_pixel(1, 0, Rgba([255, 0, 0, 255]));

        let result = premultiply_bgra(&img);
        assert_eq!(&result[0..4], &[128, 128, 128, 128]);
        assert_eq!(&result[4..8], &[0, 0, 255, 255]);
    }

    #[test]
    fn test_header_and_toc() {
        let result = to_x11(&[solid(24, 0), solid(48, 0)]).unwrap();

        assert_eq!(&result[0..4], b"Xcur");
        let word = |at: usize| u32::from_le_bytes([result[at], result[at + 1], result[at + 2], result[at + 3]]);
        assert_eq!(word(8), VERSION);
        assert_eq!(word(12), 2);
        // first toc entry
        assert_eq!(word(16), CHUNK_IMAGE);
        assert_eq!(word(20), 24);
        assert_eq!(word(24), 16 + 24);
        // second chunk starts after the first image
        assert_eq!(word(36), 16 + 24 + 36 + 24 * 24 * 4);
        assert_eq!(result.len(), 16 + 24 + 2 * 36 + (24 * 24 + 48 * 48) * 4);
    }

    #[test]
    fn test_parses_with_xcursor_crate() {
        let data = to_x11(&[solid(24, 50), solid(24, 50), solid(36, 50)]).unwrap();
        let images = xcursor::parser::parse_xcursor(&data).unwrap();

        assert_eq!(images.len(), 3);
        assert_eq!(images[0].size, 24);
        assert_eq!(images[0].xhot, 12);
        assert_eq!(images[0].delay, 50);
        assert_eq!(images[2].width, 36);
    }
}
