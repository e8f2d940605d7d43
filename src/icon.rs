use std::{
    error::Error,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
    result,
};

use ico::{IconDir, IconDirEntry, IconImage, ResourceType};
use image::{imageops, ImageBuffer, Rgba, RgbaImage};
use log::debug;

type Result<T> = result::Result<T, Box<dyn Error>>;

/// Premultiplied RGBA on a common 0..=255*255 scale: color channels hold
/// `c * a`, alpha holds `a * 255`.
type PremultipliedImage = ImageBuffer<Rgba<u16>, Vec<u16>>;

/// Image sizes stored in the icon, largest first.
pub const ICON_SIZES: [u32; 6] = [256, 128, 64, 48, 32, 16];

/// Largest width/height the ICO directory can describe.
pub const MAX_ICON_SIZE: u32 = 256;

/// Builds an icon directory holding `image` resampled to each of `sizes`.
///
/// Sizes equal to the source are stored as-is, smaller ones are area
/// averaged with premultiplied alpha so transparent pixels do not darken
/// partially covered edges. Upscaling is refused.
pub fn encode(image: &RgbaImage, sizes: &[u32]) -> Result<IconDir> {
    if sizes.is_empty() {
        return Err("icon needs at least one size".into());
    }
    let (width, height) = image.dimensions();
    if width != height {
        return Err(format!("icon source must be square, got {}x{}", width, height).into());
    }

    let premultiplied = premultiply(image);
    let mut icon_dir = IconDir::new(ResourceType::Icon);
    for &size in sizes {
        if size == 0 || size > MAX_ICON_SIZE {
            return Err(format!("icon size {} is outside 1..={}", size, MAX_ICON_SIZE).into());
        }
        if size > width {
            return Err(format!("icon size {} is larger than the {}px source", size, width).into());
        }

        let frame = if size == width {
            image.clone()
        } else {
            unpremultiply(&imageops::thumbnail(&premultiplied, size, size))
        };
        let icon_image = IconImage::from_rgba_data(size, size, frame.into_raw());
        icon_dir.add_entry(IconDirEntry::encode(&icon_image)?);
        debug!("encoded {}x{} icon image", size, size);
    }

    Ok(icon_dir)
}

fn premultiply(image: &RgbaImage) -> PremultipliedImage {
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        let a = a as u16;
        Rgba([r as u16 * a, g as u16 * a, b as u16 * a, a * 255])
    })
}

fn unpremultiply(image: &PremultipliedImage) -> RgbaImage {
    RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
        if a == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let channel = |c: u16| ((c as u32 * 255 + a as u32 / 2) / a as u32).min(255) as u8;
        let alpha = ((a as u32 + 127) / 255) as u8;
        Rgba([channel(r), channel(g), channel(b), alpha])
    })
}

pub fn write_to<W: Write>(icon_dir: &IconDir, writer: W) -> Result<()> {
    icon_dir.write(writer)?;
    Ok(())
}

pub fn to_bytes(icon_dir: &IconDir) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_to(icon_dir, &mut bytes)?;
    Ok(bytes)
}

/// Writes the icon to `path`, replacing any existing file.
pub fn save(icon_dir: &IconDir, path: &Path) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| format!("cannot create {}: {}", path.display(), e))?;
    let mut writer = BufWriter::new(file);
    write_to(icon_dir, &mut writer)?;
    writer.flush()?;
    Ok(())
}
