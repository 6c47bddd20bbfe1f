// Windows .cur / .ani serialization

use byteorder::{LittleEndian, WriteBytesExt};
use image::ImageFormat;
use std::io::{Cursor, Write};
use tracing::warn;

use super::cursor_types::CursorImage;
use crate::error::BuildResult;

const ICO_TYPE_CUR: u16 = 2;
const ICONDIR_SIZE: usize = 6;
const ICONDIR_ENTRY_SIZE: usize = 16;
/// Largest edge an ICONDIR entry can describe (stored as 0).
pub const MAX_CUR_SIZE: u32 = 256;

const ANIH_SIZE: u32 = 36;
const ICON_FLAG: u32 = 0x1;

/// Encodes one static cursor. Each image becomes a PNG-compressed entry.
pub fn to_cur(images: &[CursorImage]) -> BuildResult<Vec<u8>> {
    let entries: Vec<&CursorImage> = images
        .iter()
        .filter(|img| {
            let fits = img.image.width() <= MAX_CUR_SIZE && img.image.height() <= MAX_CUR_SIZE;
            if !fits {
                warn!(
                    "Skipping {}px image; .cur entries cannot exceed {}px",
                    img.nominal_size, MAX_CUR_SIZE
                );
            }
            fits
        })
        .collect();

    let mut payloads = Vec::with_capacity(entries.len());
    for img in &entries {
        let mut png = Vec::new();
        img.image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        payloads.push(png);
    }

    let mut output = Vec::new();
    output.write_u16::<LittleEndian>(0)?;
    output.write_u16::<LittleEndian>(ICO_TYPE_CUR)?;
    output.write_u16::<LittleEndian>(entries.len() as u16)?;

    let mut offset = ICONDIR_SIZE + ICONDIR_ENTRY_SIZE * entries.len();
    for (img, png) in entries.iter().zip(&payloads) {
        let (hotspot_x, hotspot_y) = img.clamped_hotspot();
        output.write_u8(dir_dimension(img.image.width()))?;
        output.write_u8(dir_dimension(img.image.height()))?;
        output.write_u8(0)?; // color count
        output.write_u8(0)?; // reserved
        output.write_u16::<LittleEndian>(hotspot_x as u16)?;
        output.write_u16::<LittleEndian>(hotspot_y as u16)?;
        output.write_u32::<LittleEndian>(png.len() as u32)?;
        output.write_u32::<LittleEndian>(offset as u32)?;
        offset += png.len();
    }

    for png in &payloads {
        output.write_all(png)?;
    }

    Ok(output)
}

fn dir_dimension(px: u32) -> u8 {
    if px >= MAX_CUR_SIZE { 0 } else { px as u8 }
}

/// Milliseconds to ANI display-rate jiffies (1/60 s), never zero.
pub fn ms_to_jiffies(delay_ms: u32) -> u32 {
    ((delay_ms as u64 * 60 + 500) / 1000).max(1) as u32
}

/// Encodes an animated cursor. `frames[i]` holds every size of frame `i`.
pub fn to_ani(frames: &[Vec<CursorImage>]) -> BuildResult<Vec<u8>> {
    let mut icons = Vec::with_capacity(frames.len());
    let mut rates = Vec::with_capacity(frames.len());
    for frame in frames {
        icons.push(to_cur(frame)?);
        rates.push(ms_to_jiffies(frame.first().map(|img| img.delay_ms).unwrap_or(0)));
    }
    let step_count = frames.len() as u32;
    let display_rate = rates.first().copied().unwrap_or(1);

    let mut body = Vec::new();
    body.write_all(b"ACON")?;

    body.write_all(b"anih")?;
    body.write_u32::<LittleEndian>(ANIH_SIZE)?;
    body.write_u32::<LittleEndian>(ANIH_SIZE)?;
    body.write_u32::<LittleEndian>(step_count)?; // frames
    body.write_u32::<LittleEndian>(step_count)?; // steps
    body.write_u32::<LittleEndian>(0)?; // width
    body.write_u32::<LittleEndian>(0)?; // height
    body.write_u32::<LittleEndian>(0)?; // bit count
    body.write_u32::<LittleEndian>(0)?; // planes
    body.write_u32::<LittleEndian>(display_rate)?;
    body.write_u32::<LittleEndian>(ICON_FLAG)?;

    body.write_all(b"rate")?;
    body.write_u32::<LittleEndian>(4 * step_count)?;
    for rate in &rates {
        body.write_u32::<LittleEndian>(*rate)?;
    }

    let mut list = Vec::new();
    list.write_all(b"fram")?;
    for icon in &icons {
        list.write_all(b"icon")?;
        list.write_u32::<LittleEndian>(icon.len() as u32)?;
        list.write_all(icon)?;
        // chunks are word aligned
        if icon.len() % 2 == 1 {
            list.write_u8(0)?;
        }
    }
    body.write_all(b"LIST")?;
    body.write_u32::<LittleEndian>(list.len() as u32)?;
    body.write_all(&list)?;

    let mut output = Vec::with_capacity(body.len() + 8);
    output.write_all(b"RIFF")?;
    output.write_u32::<LittleEndian>(body.len() as u32)?;
    output.write_all(&body)?;

    Ok(output)
}

/// Regroups row-ordered images (scale-major) into frame-major order.
pub fn group_frames(images: Vec<CursorImage>) -> Vec<Vec<CursorImage>> {
    let mut frames: Vec<Vec<CursorImage>> = Vec::new();
    let mut seen: Vec<(u32, usize)> = Vec::new();

    for img in images {
        let frame_ix = match seen.iter_mut().find(|(size, _)| *size == img.nominal_size) {
            Some((_, count)) => {
                *count += 1;
                *count - 1
            }
            None => {
                seen.push((img.nominal_size, 1));
                0
            }
        };
        if frames.len() <= frame_ix {
            frames.resize_with(frame_ix + 1, Vec::new);
        }
        frames[frame_ix].push(img);
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn image(size: u32, hotspot: u32, delay_ms: u32) -> CursorImage {
        CursorImage {
            image: RgbaImage::from_pixel(size, size, Rgba([10, 20, 30, 255])),
            nominal_size: size,
            hotspot: (hotspot, hotspot),
            delay_ms,
        }
    }

    fn u16_at(data: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([data[at], data[at + 1]])
    }

    fn u32_at(data: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
    }

    #[test]
    fn test_cur_directory() {
        let data = to_cur(&[image(24, 4, 0), image(48, 8, 0)]).unwrap();

        assert_eq!(&data[0..4], &[0x00, 0x00, 0x02, 0x00]);
        assert_eq!(u16_at(&data, 4), 2);
        // first entry
        assert_eq!(data[6], 24);
        assert_eq!(u16_at(&data, 10), 4);
        let size = u32_at(&data, 14) as usize;
        let offset = u32_at(&data, 18) as usize;
        assert_eq!(offset, 6 + 2 * 16);

        let decoded = image::load_from_memory_with_format(&data[offset..offset + size], ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(decoded.dimensions(), (24, 24));
        assert_eq!(decoded.get_pixel(0, 0), &Rgba([10, 20, 30, 255]));

        // second entry
        assert_eq!(data[22], 48);
        assert_eq!(u16_at(&data, 26), 8);
    }

    #[test]
    fn test_cur_skips_oversized() {
        let data = to_cur(&[image(24, 1, 0), image(288, 1, 0)]).unwrap();
        assert_eq!(u16_at(&data, 4), 1);
    }

    #[test]
    fn test_jiffies() {
        assert_eq!(ms_to_jiffies(100), 6);
        assert_eq!(ms_to_jiffies(50), 3);
        assert_eq!(ms_to_jiffies(0), 1);
        assert_eq!(ms_to_jiffies(1000), 60);
    }

    #[test]
    fn test_group_frames() {
        let rows = vec![image(24, 0, 30), image(24, 0, 30), image(36, 0, 30), image(36, 0, 30)];
        let frames = group_frames(rows);
        assert_eq!(frames.len(), 2);
        let sizes: Vec<u32> = frames[1].iter().map(|i| i.nominal_size).collect();
        assert_eq!(sizes, [24, 36]);
    }

    #[test]
    fn test_ani_layout() {
        let frames = group_frames(vec![image(24, 2, 100), image(24, 2, 100), image(24, 2, 100)]);
        let data = to_ani(&frames).unwrap();

        assert_eq!(&data[0..4], b"RIFF");
        assert_eq!(u32_at(&data, 4) as usize, data.len() - 8);
        assert_eq!(&data[8..12], b"ACON");
        assert_eq!(&data[12..16], b"anih");
        assert_eq!(u32_at(&data, 20), 36);
        assert_eq!(u32_at(&data, 24), 3); // frames
        assert_eq!(u32_at(&data, 48), 6); // display rate
        assert_eq!(u32_at(&data, 52), ICON_FLAG);
        assert_eq!(&data[56..60], b"rate");
        assert_eq!(u32_at(&data, 60), 12);
        assert_eq!(&data[76..80], b"LIST");
        assert_eq!(&data[84..88], b"fram");
        assert_eq!(&data[88..92], b"icon");
        assert_eq!(&data[96..100], &[0x00, 0x00, 0x02, 0x00]);
    }
}
